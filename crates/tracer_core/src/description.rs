//! JSON scene descriptions.
//!
//! A scene file lists entities, lighting, sky colors, the initial camera
//! and an optional environment map path. Every field except `entities`
//! has a default.
//!
//! ```json
//! {
//!   "name": "glass",
//!   "lighting": { "ambient": 0.2, "sun_direction": [0.0, 1.0, 0.0] },
//!   "environment_map": "skybox.tga",
//!   "entities": [
//!     { "shape": { "sphere": { "radius": 1.0 } }, "position": [0.0, 0.0, -5.0],
//!       "material": { "dielectric": { "refractive_index": 1.5 } } },
//!     { "shape": { "plane": { "normal": [0.0, 1.0, 0.0] } }, "position": [0.0, -1.5, 0.0] }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracer_math::Vec3;

use crate::environment::EnvironmentMap;
use crate::scene::{
    CameraSettings, Entity, Lighting, Scene, SceneError, SceneResult, Shape, Sky, DEFAULT_SEED,
};

/// Serialized form of a [`Scene`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub name: String,
    pub seed: u32,
    pub lighting: Lighting,
    pub sky: Sky,
    pub camera: CameraSettings,

    /// Path to a cube-cross image, relative to the scene file
    pub environment_map: Option<PathBuf>,

    pub entities: Vec<Entity>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            seed: DEFAULT_SEED,
            lighting: Lighting::default(),
            sky: Sky::default(),
            camera: CameraSettings::default(),
            environment_map: None,
            entities: Vec::new(),
        }
    }
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json(text: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the description as pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build and validate the scene.
    ///
    /// The environment map path is resolved against `base_dir`. A map that
    /// fails to load is logged and skipped; the scene then renders with
    /// its sky gradient.
    pub fn into_scene(self, base_dir: Option<&Path>) -> SceneResult<Scene> {
        if self.entities.is_empty() {
            return Err(SceneError::Invalid("scene has no entities".to_string()));
        }

        let mut scene = Scene::new(self.name);
        scene.seed = self.seed;
        scene.lighting = self.lighting;
        scene.sky = self.sky;
        scene.camera = self.camera;

        for mut entity in self.entities {
            // Files may carry unnormalized plane normals
            if let Shape::Plane { normal } = entity.shape {
                entity.shape = Shape::Plane {
                    normal: unit_or_zero(normal),
                };
            }
            scene.add_entity(entity);
        }
        scene.lighting.sun_direction = unit_or_zero(scene.lighting.sun_direction);

        scene.validate()?;

        if let Some(map_path) = self.environment_map {
            let full_path = match base_dir {
                Some(base) if map_path.is_relative() => base.join(&map_path),
                _ => map_path,
            };

            match EnvironmentMap::load(&full_path) {
                Ok(map) => scene.set_environment(Some(Arc::new(map))),
                Err(e) => {
                    log::warn!("Environment map unavailable, using sky gradient: {}", e);
                }
            }
        }

        Ok(scene)
    }
}

impl From<&Scene> for SceneDescription {
    fn from(scene: &Scene) -> Self {
        Self {
            name: scene.name.clone(),
            seed: scene.seed,
            lighting: scene.lighting,
            sky: scene.sky,
            camera: scene.camera,
            environment_map: scene.environment().map(|map| PathBuf::from(&map.path)),
            entities: scene.entities().to_vec(),
        }
    }
}

/// Normalize `v` unless it already has unit length, so saved scenes reload bit-exact.
fn unit_or_zero(v: Vec3) -> Vec3 {
    if v.is_normalized() {
        v
    } else {
        v.normalize_or_zero()
    }
}

/// Load a scene from a JSON file.
///
/// The scene name defaults to the file stem when the file does not set one.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;

    let mut description = SceneDescription::from_json(&text)?;
    if description.name == SceneDescription::default().name {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            description.name = stem.to_string();
        }
    }

    let scene = description.into_scene(path.parent())?;
    log::info!(
        "Loaded scene '{}' from {} ({} entities)",
        scene.name,
        path.display(),
        scene.entity_count()
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Material;

    const GLASS_SCENE: &str = r#"{
        "name": "glass",
        "seed": 7,
        "lighting": { "ambient": 0.3 },
        "entities": [
            { "shape": { "sphere": { "radius": 1.0 } }, "position": [0.0, 0.0, -5.0],
              "material": { "dielectric": { "refractive_index": 1.5 } } },
            { "shape": { "sphere": { "radius": -0.4 } }, "position": [0.0, 0.0, -5.0],
              "material": { "dielectric": { "refractive_index": 1.5 } } },
            { "shape": { "plane": { "normal": [0.0, 2.0, 0.0] } }, "position": [0.0, -1.5, 0.0],
              "color": [0.8, 0.8, 0.8], "material": { "metal": { "fuzz": 0.0 } } },
            { "shape": { "cuboid": { "half_extents": [1.0, 1.0, 1.0] } },
              "position": [4.0, 0.0, -9.0], "material": "lambertian" }
        ]
    }"#;

    #[test]
    fn test_parse_description() {
        let description = SceneDescription::from_json(GLASS_SCENE).unwrap();

        assert_eq!(description.name, "glass");
        assert_eq!(description.seed, 7);
        assert_eq!(description.lighting.ambient, 0.3);
        // Unspecified fields take defaults
        assert_eq!(description.lighting.sun_direction, Lighting::default().sun_direction);
        assert_eq!(description.sky, Sky::default());
        assert_eq!(description.entities.len(), 4);
        assert_eq!(
            description.entities[2].material,
            Material::Metal { fuzz: 0.0 }
        );
        assert_eq!(description.entities[0].color, Vec3::ONE);
    }

    #[test]
    fn test_into_scene_normalizes_planes() {
        let scene = SceneDescription::from_json(GLASS_SCENE)
            .unwrap()
            .into_scene(None)
            .unwrap();

        assert_eq!(scene.entity_count(), 4);
        assert_eq!(scene.seed, 7);
        assert_eq!(
            scene.entity(2).map(|e| e.shape),
            Some(Shape::Plane { normal: Vec3::Y })
        );
    }

    #[test]
    fn test_missing_environment_map_falls_back() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut description = SceneDescription::from_json(GLASS_SCENE).unwrap();
        description.environment_map = Some(PathBuf::from("no_such_skybox.tga"));

        let scene = description.into_scene(Some(Path::new("/nonexistent"))).unwrap();
        assert!(scene.environment().is_none());
    }

    #[test]
    fn test_rejects_empty_and_invalid_scenes() {
        let empty = SceneDescription::default().into_scene(None);
        assert!(matches!(empty, Err(SceneError::Invalid(_))));

        let bad = SceneDescription::from_json(
            r#"{ "entities": [
                { "shape": { "sphere": { "radius": 0.0 } }, "position": [0, 0, 0] }
            ] }"#,
        )
        .unwrap()
        .into_scene(None);
        assert!(matches!(bad, Err(SceneError::InvalidEntity { index: 0, .. })));

        assert!(matches!(
            SceneDescription::from_json("{ not json"),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_scene() {
        let scene = SceneDescription::from_json(GLASS_SCENE)
            .unwrap()
            .into_scene(None)
            .unwrap();

        let text = SceneDescription::from(&scene).to_json().unwrap();
        let reloaded = SceneDescription::from_json(&text)
            .unwrap()
            .into_scene(None)
            .unwrap();

        assert_eq!(reloaded.entities(), scene.entities());
        assert_eq!(reloaded.lighting, scene.lighting);
    }

    #[test]
    fn test_unit_vectors_pass_through_unchanged() {
        let sun = Vec3::new(1.0, 1.0, 1.0).normalize();
        let mut description = SceneDescription::from_json(GLASS_SCENE).unwrap();
        description.lighting.sun_direction = sun;

        let scene = description.into_scene(None).unwrap();
        assert_eq!(scene.lighting.sun_direction, sun);

        assert!(unit_or_zero(Vec3::new(0.0, 3.0, 4.0)).abs_diff_eq(Vec3::new(0.0, 0.6, 0.8), 1e-6));
        assert_eq!(unit_or_zero(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_bundled_scene_parses() {
        let text = include_str!("../../../scenes/glass.json");
        let scene = SceneDescription::from_json(text)
            .unwrap()
            .into_scene(None)
            .unwrap();

        assert_eq!(scene.name, "glass");
        assert_eq!(scene.entity_count(), 5);
        assert!((scene.lighting.sun_direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_load_scene_uses_file_stem() {
        let path = std::env::temp_dir().join("tracer_core_stem_test.json");
        std::fs::write(
            &path,
            r#"{ "entities": [
                { "shape": { "sphere": { "radius": 1.0 } }, "position": [0, 0, -3] }
            ] }"#,
        )
        .unwrap();

        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.name, "tracer_core_stem_test");

        let _ = std::fs::remove_file(path);
        assert!(matches!(
            load_scene("/nonexistent/scene.json"),
            Err(SceneError::Io(_))
        ));
    }
}
