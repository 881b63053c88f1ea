//! Nearest-hit queries against a scene.
//!
//! Every cast is a linear scan over the scene's entities. Hits are
//! accepted strictly inside `(epsilon, closest_so_far)`, so of two
//! entities at the same distance the one scanned first wins.

use tracer_core::{Entity, Scene, Shape};
use tracer_math::{Interval, Ray, Vec3};

use crate::{plane, sphere};

/// Geometry of a single ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, facing the incoming ray
    pub normal: Vec3,
    /// Whether the ray leaves the surface's medium (selects the refraction ratio)
    pub backface: bool,
}

/// Nearest intersection of a ray with the scene.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub point: Vec3,
    pub normal: Vec3,
    pub t: f32,
    pub backface: bool,
    /// Index of the hit entity in scan order
    pub index: usize,
    pub entity: &'a Entity,
}

/// Anything a ray can be tested against.
pub trait Intersect {
    /// Test if a ray hits this object strictly inside `ray_t`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit>;
}

impl Intersect for Entity {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        match self.shape {
            Shape::Sphere { radius } => sphere::intersect(self.position, radius, ray, ray_t),
            Shape::Plane { normal } => plane::intersect(self.position, normal, ray, ray_t),
            Shape::Cuboid { .. } => unimplemented!("cuboid intersection is not implemented"),
        }
    }
}

/// Find the nearest entity hit by `ray` beyond `epsilon`.
///
/// `ignore` skips one entity regardless of distance; the shadow test uses
/// it so a ray leaving a surface cannot hit that surface again.
/// `ray.direction` must be normalized.
pub fn cast<'a>(
    scene: &'a Scene,
    ray: &Ray,
    ignore: Option<usize>,
    epsilon: f32,
) -> Option<Hit<'a>> {
    let mut closest = None;
    let mut ray_t = Interval::new(epsilon, f32::INFINITY);

    for (index, entity) in scene.entities().iter().enumerate() {
        if ignore == Some(index) {
            continue;
        }

        if let Some(surface) = entity.intersect(ray, ray_t) {
            ray_t = ray_t.with_max(surface.t);
            closest = Some(Hit {
                point: surface.point,
                normal: surface.normal,
                t: surface.t,
                backface: surface.backface,
                index,
                entity,
            });
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracer_core::Material;

    const EPSILON: f32 = 1e-4;

    fn glass() -> Material {
        Material::Dielectric {
            refractive_index: 1.5,
        }
    }

    #[test]
    fn test_cast_misses_empty_scene() {
        let scene = Scene::new("empty");
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(cast(&scene, &ray, None, EPSILON).is_none());
    }

    #[test]
    fn test_normal_antiparallel_to_ray() {
        let scene = Scene::new("unit").with_entity(Entity::sphere(Vec3::ZERO, 1.0));
        let ray = Ray::normalized(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 5.0));

        let hit = cast(&scene, &ray, None, EPSILON).expect("ray aimed at the center must hit");
        assert_eq!(hit.index, 0);
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.normal + ray.direction).length() < 1e-5);
        assert!(!hit.backface);
    }

    #[test]
    fn test_nearest_entity_wins() {
        let scene = Scene::new("row")
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, 10.0), 1.0))
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0))
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, 20.0), 1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let hit = cast(&scene, &ray, None, EPSILON).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_tie_keeps_first_entity() {
        let scene = Scene::new("twins")
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0))
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert_eq!(cast(&scene, &ray, None, EPSILON).unwrap().index, 0);
    }

    #[test]
    fn test_ignored_entity_is_skipped() {
        let scene = Scene::new("pair")
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0))
            .with_entity(Entity::plane(Vec3::new(0.0, 0.0, 20.0), Vec3::Z));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let hit = cast(&scene, &ray, Some(0), EPSILON).unwrap();
        assert_eq!(hit.index, 1);
        assert!(cast(&scene, &ray, Some(1), EPSILON).is_some_and(|h| h.index == 0));
    }

    #[test]
    fn test_nested_shell_never_rehits_ignored_entity() {
        // Glass shell: outer sphere with a negative-radius cavity at the same center
        let scene = Scene::new("shell")
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0).with_material(glass()))
            .with_entity(Entity::sphere(Vec3::new(0.0, 0.0, -5.0), -0.4).with_material(glass()));

        let entry = cast(&scene, &Ray::new(Vec3::ZERO, -Vec3::Z), None, EPSILON).unwrap();
        assert_eq!(entry.index, 0);
        assert!(!entry.backface);

        // Rays leaving the entry point in many directions, each ignoring the outer sphere
        for i in 0..64 {
            let angle = i as f32 * 0.1;
            let direction = Vec3::new(angle.sin() * 0.5, angle.cos() * 0.5, -1.0).normalize();
            let ray = Ray::new(entry.point, direction);
            if let Some(hit) = cast(&scene, &ray, Some(entry.index), EPSILON) {
                assert_ne!(hit.index, entry.index);
            }
        }

        // Straight through the middle, the cavity is next and reads as a backface
        let inner = cast(&scene, &Ray::new(entry.point, -Vec3::Z), Some(entry.index), EPSILON)
            .unwrap();
        assert_eq!(inner.index, 1);
        assert!(inner.backface);
        assert!((inner.point.z + 4.6).abs() < 1e-4);
    }

    #[test]
    #[should_panic(expected = "cuboid")]
    fn test_cuboid_is_fatal() {
        let scene =
            Scene::new("box").with_entity(Entity::cuboid(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let _ = cast(&scene, &ray, None, EPSILON);
    }
}
