//! Recursive radiance along a ray.
//!
//! Two lighting modes share the entry point. Path tracing follows material
//! scattering until the ray escapes, is absorbed or runs out of depth.
//! The shadow test shades primary hits with a single sun and an ambient
//! floor, and ignores materials.

use tracer_core::Scene;
use tracer_math::{Color, Ray};

use crate::{cast, Environment, LightingMode, Lcg, RenderConfig, Scatter};

/// Compute the color seen by a ray.
///
/// `depth` bounds the number of surface interactions; zero returns black.
pub fn trace(scene: &Scene, ray: &Ray, depth: u32, config: &RenderConfig, rng: &mut Lcg) -> Color {
    let environment = Environment::for_scene(scene);
    match config.lighting {
        LightingMode::PathTrace => path_trace(scene, &environment, ray, depth, config, rng),
        LightingMode::ShadowTest => shadow_test(scene, &environment, ray, depth, config),
    }
}

fn path_trace(
    scene: &Scene,
    environment: &Environment,
    ray: &Ray,
    depth: u32,
    config: &RenderConfig,
    rng: &mut Lcg,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(hit) = cast(scene, ray, None, config.epsilon) else {
        return environment.sample(ray.direction);
    };

    let entity = hit.entity;
    match entity
        .material
        .scatter(hit.normal, ray.direction, hit.backface, rng)
    {
        Some(scattered) => {
            let next = Ray::new(hit.point, scattered.direction);
            let incoming = path_trace(scene, environment, &next, depth - 1, config, rng);
            entity.color * scattered.attenuation * incoming
        }
        // Ray was absorbed
        None => Color::ZERO,
    }
}

fn shadow_test(
    scene: &Scene,
    environment: &Environment,
    ray: &Ray,
    depth: u32,
    config: &RenderConfig,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(hit) = cast(scene, ray, None, config.epsilon) else {
        return environment.sample(ray.direction);
    };

    let lighting = scene.lighting;
    let shadow_ray = Ray::new(hit.point, lighting.sun_direction);
    let occluded = cast(scene, &shadow_ray, Some(hit.index), config.epsilon).is_some();

    let intensity = if occluded {
        lighting.ambient
    } else {
        lighting.ambient.max(hit.normal.dot(lighting.sun_direction))
    };

    hit.entity.color * intensity
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracer_core::{Entity, Material, Sky};
    use tracer_math::Vec3;

    fn shadow_config() -> RenderConfig {
        RenderConfig {
            lighting: LightingMode::ShadowTest,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_miss_returns_environment() {
        let scene = Scene::new("empty");
        let mut rng = Lcg::default();
        let sky = Sky::default();

        for config in [RenderConfig::default(), shadow_config()] {
            for direction in [Vec3::Y, -Vec3::Y, Vec3::new(0.3, 0.2, -1.0).normalize()] {
                let color = trace(&scene, &Ray::new(Vec3::ZERO, direction), 5, &config, &mut rng);
                let t = 0.5 * (direction.y + 1.0);
                let expected = sky.horizon * (1.0 - t) + sky.zenith * t;
                assert_eq!(color, expected);
            }
        }
    }

    #[test]
    fn test_zero_depth_is_black() {
        let scene = Scene::new("empty");
        let mut rng = Lcg::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert_eq!(trace(&scene, &ray, 0, &RenderConfig::default(), &mut rng), Color::ZERO);
        assert_eq!(trace(&scene, &ray, 0, &shadow_config(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_mirror_reflects_sky() {
        // A perfect mirror floor facing up, viewed straight down
        let scene = Scene::new("mirror").with_entity(
            Entity::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y)
                .with_material(Material::Metal { fuzz: 0.0 }),
        );
        let mut rng = Lcg::default();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Y);

        let color = trace(&scene, &ray, 5, &RenderConfig::default(), &mut rng);
        // White entity, 0.5 metal factor, zenith sky above
        let expected = 0.5 * Sky::default().zenith;
        assert!((color - expected).length() < 1e-5);

        // Only one bounce allowed: the reflected ray has no budget left
        assert_eq!(trace(&scene, &ray, 1, &RenderConfig::default(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_entity_color_tints_path() {
        let scene = Scene::new("tinted").with_entity(
            Entity::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y)
                .with_color(Color::new(1.0, 0.0, 0.0))
                .with_material(Material::Metal { fuzz: 0.0 }),
        );
        let mut rng = Lcg::default();
        let color = trace(
            &scene,
            &Ray::new(Vec3::ZERO, -Vec3::Y),
            5,
            &RenderConfig::default(),
            &mut rng,
        );

        assert!(color.x > 0.0);
        assert_eq!(color.y, 0.0);
        assert_eq!(color.z, 0.0);
    }

    #[test]
    fn test_shadow_test_lit_and_occluded() {
        let mut scene = Scene::new("sun").with_entity(
            Entity::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y).with_color(Color::splat(0.8)),
        );
        scene.lighting.sun_direction = Vec3::Y;
        scene.lighting.ambient = 0.2;
        let mut rng = Lcg::default();
        let config = shadow_config();
        let down = Ray::new(Vec3::ZERO, -Vec3::Y);

        // Sun straight overhead, nothing in the way
        let lit = trace(&scene, &down, 5, &config, &mut rng);
        assert!((lit - Color::splat(0.8)).length() < 1e-5);

        // Put a blocker between the floor and the sun, above the viewer
        scene.add_entity(Entity::sphere(Vec3::new(0.0, 5.0, 0.0), 1.0));
        let shaded = trace(&scene, &down, 5, &config, &mut rng);
        assert!((shaded - Color::splat(0.8 * 0.2)).length() < 1e-5);
    }

    #[test]
    fn test_shadow_test_ambient_floor() {
        let mut scene = Scene::new("grazing")
            .with_entity(Entity::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y));
        scene.lighting.sun_direction = Vec3::new(1.0, 0.1, 0.0).normalize();
        scene.lighting.ambient = 0.3;
        let mut rng = Lcg::default();

        let color = trace(&scene, &Ray::new(Vec3::ZERO, -Vec3::Y), 5, &shadow_config(), &mut rng);
        assert!((color - Color::splat(0.3)).length() < 1e-5);
    }

    #[test]
    fn test_glass_sphere_passes_light() {
        let scene = Scene::new("glass").with_entity(
            Entity::sphere(Vec3::new(0.0, 0.0, -3.0), 1.0).with_material(Material::Dielectric {
                refractive_index: 1.5,
            }),
        );
        let mut rng = Lcg::new(17);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let color = trace(&scene, &ray, 50, &RenderConfig::default(), &mut rng);
        // Glass never absorbs, so whatever escapes is sky colored and non-zero
        assert!(color.min_element() > 0.0);
        assert!(color.max_element() <= 1.0 + 1e-5);
    }
}
