//! Rendering module
//!
//! Projects the simulation into screen-space primitives and, optionally,
//! rasterizes them on the CPU. Nothing here mutates game state.

pub mod color;
pub mod frame;
pub mod framebuffer;

pub use color::{Rgba, colors};
pub use frame::{
    Frame, Marker, MarkerKind, Minimap, Rect, Reticle, Sprite, WallStripe, minimap, render_frame,
    wall_color,
};
pub use framebuffer::Framebuffer;
