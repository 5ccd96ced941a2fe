//! Software rendering into the back buffer.

pub mod font;
pub mod raster;
pub mod scene;

pub use raster::Framebuffer;
