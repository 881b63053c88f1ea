//! Scene model for the tracer.
//!
//! A scene is an ordered list of implicit primitives plus the lighting
//! parameters the integrator needs. Scenes are built once and stay
//! immutable while frames are rendered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracer_math::{Color, Interval, Quat, Vec3};

use crate::environment::EnvironmentMap;

/// Seed used when a scene does not specify one (or specifies zero).
pub const DEFAULT_SEED: u32 = 0x69420;

/// Errors that can occur while loading or validating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid entity {index}: {reason}")]
    InvalidEntity { index: usize, reason: String },

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Surface response of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// Diffuse scattering around the surface normal.
    #[default]
    Lambertian,

    /// Mirror reflection perturbed by `fuzz` (0 = perfect mirror, 1 = very rough).
    Metal { fuzz: f32 },

    /// Refractive surface (1.0 = air, 1.5 = glass, 2.4 = diamond).
    Dielectric { refractive_index: f32 },
}

/// Geometry of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Sphere centered on the entity position.
    ///
    /// A negative radius inverts the backface classification, which is how
    /// hollow glass shells are authored: nest a negative sphere inside a
    /// positive one.
    Sphere { radius: f32 },

    /// Infinite plane through the entity position.
    ///
    /// The entity orientation is not applied to the normal.
    Plane { normal: Vec3 },

    /// Box centered on the entity position. Intersection is not implemented.
    Cuboid { half_extents: Vec3 },
}

/// A renderable primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub shape: Shape,

    pub position: Vec3,

    /// Reserved; no current shape reads it.
    #[serde(default = "default_orientation")]
    pub orientation: Quat,

    /// Surface color, multiplied into the material attenuation
    #[serde(default = "default_color")]
    pub color: Color,

    #[serde(default)]
    pub material: Material,
}

fn default_orientation() -> Quat {
    Quat::IDENTITY
}

fn default_color() -> Color {
    Color::ONE
}

impl Entity {
    /// Create an entity with the default (white, Lambertian) surface.
    pub fn new(shape: Shape, position: Vec3) -> Self {
        Self {
            shape,
            position,
            orientation: Quat::IDENTITY,
            color: Color::ONE,
            material: Material::Lambertian,
        }
    }

    /// Create a sphere entity.
    pub fn sphere(position: Vec3, radius: f32) -> Self {
        Self::new(Shape::Sphere { radius }, position)
    }

    /// Create a plane entity. The normal is normalized.
    pub fn plane(position: Vec3, normal: Vec3) -> Self {
        Self::new(
            Shape::Plane {
                normal: normal.normalize_or_zero(),
            },
            position,
        )
    }

    /// Create a cuboid entity.
    pub fn cuboid(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(Shape::Cuboid { half_extents }, position)
    }

    /// Set the surface color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Check the entity for values the renderer cannot handle.
    fn validate(&self) -> Result<(), String> {
        if !self.position.is_finite() {
            return Err("position is not finite".to_string());
        }
        if !self.color.is_finite() || self.color.min_element() < 0.0 {
            return Err("color must be finite and non-negative".to_string());
        }

        match self.shape {
            Shape::Sphere { radius } => {
                if !radius.is_finite() || radius == 0.0 {
                    return Err(format!("sphere radius {radius} must be finite and non-zero"));
                }
            }
            Shape::Plane { normal } => {
                if !normal.is_finite() || (normal.length() - 1.0).abs() > 1e-3 {
                    return Err("plane normal must be a unit vector".to_string());
                }
            }
            Shape::Cuboid { half_extents } => {
                if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
                    return Err("cuboid half extents must be positive".to_string());
                }
            }
        }

        match self.material {
            Material::Lambertian => {}
            Material::Metal { fuzz } => {
                if !Interval::UNIT.contains(fuzz) {
                    return Err(format!("metal fuzz {fuzz} outside [0, 1]"));
                }
            }
            Material::Dielectric { refractive_index } => {
                if !refractive_index.is_finite() || refractive_index <= 0.0 {
                    return Err(format!(
                        "refractive index {refractive_index} must be positive"
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Lighting parameters used by the shadow-test lighting mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Minimum brightness of a lit or shadowed surface
    pub ambient: f32,

    /// Unit direction toward the sun
    pub sun_direction: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            sun_direction: Vec3::new(1.0, 1.0, -1.0).normalize(),
        }
    }
}

/// Analytic sky used when no environment map is available.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sky {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

/// Initial viewpoint stored with a scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl CameraSettings {
    /// Check that the settings span a proper view basis.
    fn validate(&self) -> Result<(), String> {
        if !self.position.is_finite() || !self.look_at.is_finite() || !self.up.is_finite() {
            return Err("camera vectors must be finite".to_string());
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(format!(
                "vertical field of view {} outside (0, 180)",
                self.vfov
            ));
        }

        let forward = (self.look_at - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return Err("camera look-at point coincides with its position".to_string());
        }
        if forward.cross(self.up).length_squared() < 1e-12 {
            return Err("camera up vector is parallel to the view direction".to_string());
        }

        Ok(())
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vfov: 90.0,
        }
    }
}

/// A complete scene: entities, lighting and an optional environment map.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene name (preset name or file stem)
    pub name: String,

    /// Ambient floor and sun direction
    pub lighting: Lighting,

    /// Gradient used on escape when no environment map is present
    pub sky: Sky,

    /// Initial viewpoint
    pub camera: CameraSettings,

    /// Initial random seed for the render session
    pub seed: u32,

    entities: Vec<Entity>,
    environment: Option<Arc<EnvironmentMap>>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lighting: Lighting::default(),
            sky: Sky::default(),
            camera: CameraSettings::default(),
            seed: DEFAULT_SEED,
            entities: Vec::new(),
            environment: None,
        }
    }

    /// Add an entity and return its index.
    pub fn add_entity(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    /// Builder form of [`Scene::add_entity`].
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.add_entity(entity);
        self
    }

    /// Get an entity by index.
    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// All entities in scan order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Get entity count.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The environment map, if one was loaded.
    pub fn environment(&self) -> Option<&Arc<EnvironmentMap>> {
        self.environment.as_ref()
    }

    /// Attach or clear the environment map.
    pub fn set_environment(&mut self, environment: Option<Arc<EnvironmentMap>>) {
        self.environment = environment;
    }

    /// Check every entity and the lighting parameters.
    pub fn validate(&self) -> SceneResult<()> {
        for (index, entity) in self.entities.iter().enumerate() {
            entity
                .validate()
                .map_err(|reason| SceneError::InvalidEntity { index, reason })?;
        }

        if !self.lighting.ambient.is_finite() || self.lighting.ambient < 0.0 {
            return Err(SceneError::Invalid(format!(
                "ambient floor {} must be non-negative",
                self.lighting.ambient
            )));
        }
        if (self.lighting.sun_direction.length() - 1.0).abs() > 1e-3 {
            return Err(SceneError::Invalid(
                "sun direction must be a unit vector".to_string(),
            ));
        }
        self.camera.validate().map_err(SceneError::Invalid)?;

        Ok(())
    }
}
