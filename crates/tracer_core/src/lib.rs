//! Tracer Core - scene model and scene resources.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Entity`, `Shape`, `Material`, lighting and sky parameters
//! - **Environment maps**: cube-cross skybox images decoded into packed RGB
//! - **Scene files**: JSON scene descriptions and built-in preset scenes
//!
//! # Example
//!
//! ```ignore
//! use tracer_core::load_scene;
//!
//! let scene = load_scene("scenes/glass.json")?;
//! println!("Loaded {} entities", scene.entity_count());
//! ```

pub mod description;
pub mod environment;
pub mod presets;
pub mod scene;

// Re-export commonly used types
pub use description::{load_scene, SceneDescription};
pub use environment::{EnvironmentError, EnvironmentMap, EnvironmentResult};
pub use presets::Preset;
pub use scene::{
    CameraSettings, Entity, Lighting, Material, Scene, SceneError, SceneResult, Shape, Sky,
    DEFAULT_SEED,
};
