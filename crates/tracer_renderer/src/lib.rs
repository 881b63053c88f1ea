//! Tracer Renderer - progressive CPU raytracing
//!
//! A single-threaded raytracer over implicit primitives (spheres and
//! planes) with diffuse, metallic and dielectric materials. Frames are
//! refined progressively: after the camera moves or the output is
//! resized, the image is traced at a coarse working resolution and
//! sharpened on each following frame until every pixel is traced.

mod band;
mod camera;
mod environment;
mod framebuffer;
mod integrator;
mod intersect;
mod material;
mod plane;
mod progressive;
mod renderer;
mod rng;
mod session;
mod sphere;

pub use band::{generate_bands, render_band, Band, DEFAULT_BAND_HEIGHT};
pub use camera::{Camera, CameraPose};
pub use environment::{cube_cross_texel, sky_gradient, CubeFace, Environment};
pub use framebuffer::Framebuffer;
pub use integrator::trace;
pub use intersect::{cast, Hit, Intersect, SurfaceHit};
pub use material::{Scatter, Scattered};
pub use progressive::{
    render_pass, FrameStep, Phase, ProgressiveState, Resolution, DEFAULT_START_FRAGMENT_SIZE,
};
pub use renderer::{render_cell, Jitter, LightingMode, RenderConfig};
pub use rng::Lcg;
pub use session::{FrameInput, FrameReport, Present, Session};

/// Re-export math and scene types
pub use tracer_core::{Entity, Material, Scene, Shape};
pub use tracer_math::{Color, Interval, Ray, Vec3};
