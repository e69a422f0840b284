//! Pixel colour type and the game palette

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA colour, laid out as four consecutive bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Multiply each channel by `factor`, then subtract `shade`, truncating into 0..=255
    pub fn shaded(self, factor: f32, shade: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor - shade).clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Composite `self` over `dst` using source alpha
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let t = a as f32 / 255.0;
                let mix = |s: u8, d: u8| (s as f32 * t + d as f32 * (1.0 - t)).round() as u8;
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: 255,
                }
            }
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const SKY: Rgba = Rgba::rgb(0x87, 0xce, 0xeb);
    pub const FLOOR: Rgba = Rgba::rgb(0x5a, 0x5a, 0x5a);
    pub const WALL: Rgba = Rgba::rgb(180, 160, 130);
    /// Horizontal wall faces are darkened by this factor
    pub const HORIZONTAL_FACE: f32 = 0.8;
    /// Per-unit distance fog subtracted from each wall channel
    pub const WALL_FOG: f32 = 30.0;

    pub const ENEMY: Rgba = Rgba::rgb(0xff, 0x4d, 0x4d).with_alpha(237);
    pub const ENEMY_HIT: Rgba = Rgba::rgb(0xff, 0xe0, 0x66).with_alpha(237);
    pub const ENEMY_EYE: Rgba = Rgba::rgb(255, 255, 255);

    pub const START_MARKER: Rgba = Rgba::rgb(0x00, 0xff, 0x00);
    pub const EXIT_MARKER: Rgba = Rgba::rgb(0x00, 0x80, 0xff);
    pub const MARKER_LABEL: Rgba = Rgba::rgb(255, 255, 255);

    pub const RETICLE_FREE: Rgba = Rgba::rgb(0x00, 0xff, 0x00);
    pub const RETICLE_LOCKED: Rgba = Rgba::rgb(0xff, 0xe0, 0x66);

    pub const MINIMAP_BACKGROUND: Rgba = Rgba::rgb(0x18, 0x1c, 0x24);
    pub const MINIMAP_WALL: Rgba = Rgba::rgb(0x3a, 0x2d, 0x1a);
    pub const MINIMAP_START: Rgba = Rgba::rgb(0x00, 0xff, 0x00);
    pub const MINIMAP_EXIT: Rgba = Rgba::rgb(0x3a, 0x8d, 0xde);
    pub const MINIMAP_PLAYER: Rgba = Rgba::rgb(0xff, 0xe0, 0x66);
    pub const MINIMAP_ENEMY: Rgba = Rgba::rgb(0xff, 0x4d, 0x4d);
}
