//! CPU rasterizer for `Frame`
//!
//! Produces a tightly packed RGBA8 image that a presentation layer can upload
//! as a texture with `as_bytes`.

use glam::Vec2;

use super::color::{Rgba, colors};
use super::frame::{Frame, Minimap, Rect};

/// Reticle arm length in pixels
const RETICLE_ARM: i32 = 6;

/// Row-major RGBA pixel buffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel data as bytes, four per pixel
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Blend `color` onto the pixel at (x, y); off-screen writes are dropped
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = color.over(self.pixels[idx]);
    }

    /// Fill the pixels whose centres fall inside `[min, min + size)`
    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        let x0 = (min.x.round() as i32).max(0);
        let y0 = (min.y.round() as i32).max(0);
        let x1 = ((min.x + size.x).round() as i32).min(self.width as i32);
        let y1 = ((min.y + size.y).round() as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let x0 = ((center.x - radius).floor() as i32).max(0);
        let y0 = ((center.y - radius).floor() as i32).max(0);
        let x1 = ((center.x + radius).ceil() as i32).min(self.width as i32);
        let y1 = ((center.y + radius).ceil() as i32).min(self.height as i32);
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance_squared(center) <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Rasterize a full first-person frame; the minimap is drawn in the top-left corner
    pub fn draw_frame(&mut self, frame: &Frame) {
        let width = self.width as f32;
        let horizon = frame.horizon;
        self.fill_rect(Vec2::ZERO, Vec2::new(width, horizon), frame.sky);
        self.fill_rect(
            Vec2::new(0.0, horizon),
            Vec2::new(width, self.height as f32 - horizon),
            frame.floor,
        );

        for stripe in &frame.walls {
            self.fill_rect(
                Vec2::new(stripe.column as f32, stripe.top),
                Vec2::new(1.0, stripe.height),
                stripe.color,
            );
        }

        for sprite in &frame.sprites {
            self.fill_circle(sprite.center, sprite.size / 2.0, sprite.color);
            for eye in sprite.eyes() {
                self.fill_circle(eye, sprite.eye_radius(), colors::ENEMY_EYE);
            }
        }

        for marker in &frame.markers {
            self.draw_rect(&Rect::centered(marker.center, marker.size, marker.color));
        }

        let (rx, ry) = (frame.reticle.pos.x as i32, frame.reticle.pos.y as i32);
        for d in -RETICLE_ARM..=RETICLE_ARM {
            self.set_pixel(rx + d, ry, frame.reticle.color);
            self.set_pixel(rx, ry + d, frame.reticle.color);
        }

        self.draw_minimap(&frame.minimap, Vec2::ZERO);
    }

    /// Rasterize the overview with its top-left corner at `origin`
    pub fn draw_minimap(&mut self, map: &Minimap, origin: Vec2) {
        self.fill_rect(origin, Vec2::splat(map.size), map.background);
        for rect in map.walls.iter().chain([&map.start, &map.exit, &map.player]).chain(&map.enemies) {
            self.draw_rect(&Rect {
                min: rect.min + origin,
                ..*rect
            });
        }
    }

    fn draw_rect(&mut self, rect: &Rect) {
        self.fill_rect(rect.min, rect.size, rect.color);
    }
}
