// Re-export glam for convenience
pub use glam::*;

// Tracer math types
mod color;
mod interval;
mod ray;

pub use color::{linear_to_gamma, pack_rgb, unpack_rgb, Color};
pub use interval::Interval;
pub use ray::Ray;
