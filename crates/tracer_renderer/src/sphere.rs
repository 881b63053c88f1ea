//! Ray-sphere intersection.
//!
//! The nearer root is used when it lies beyond the acceptance interval's
//! lower bound, otherwise the farther root (the ray starts inside the
//! sphere). A far-root hit flips the normal toward the ray and counts as a
//! backface. A negative radius inverts the backface flag but leaves the
//! normal alone, which turns a sphere nested in a larger one into a cavity.

use tracer_math::{Interval, Ray, Vec3};

use crate::SurfaceHit;

/// Intersect `ray` with the sphere at `center`. `radius` may be negative.
pub fn intersect(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let oc = center - ray.origin;
    let a = ray.direction.length_squared();
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let near = (h - sqrtd) / a;
    let (t, interior) = if near > ray_t.min {
        (near, false)
    } else {
        ((h + sqrtd) / a, true)
    };

    if !ray_t.surrounds(t) {
        return None;
    }

    let point = ray.at(t);
    let outward = (point - center).normalize();

    Some(SurfaceHit {
        t,
        point,
        normal: if interior { -outward } else { outward },
        backface: interior ^ (radius < 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAY_T: Interval = Interval {
        min: 1e-4,
        max: f32::INFINITY,
    };

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect(Vec3::new(0.0, 0.0, -1.0), 0.5, &ray, RAY_T).unwrap();

        assert!((hit.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(!hit.backface);
    }

    #[test]
    fn test_sphere_miss() {
        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(intersect(Vec3::new(0.0, 0.0, -1.0), 0.5, &ray, RAY_T).is_none());

        // Sphere entirely behind the ray
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect(Vec3::new(0.0, 0.0, -3.0), 1.0, &ray, RAY_T).is_none());
    }

    #[test]
    fn test_tangent_ray_misses() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Z);
        assert!(intersect(Vec3::new(0.0, 0.0, 5.0), 1.0, &ray, RAY_T).is_none());
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = intersect(Vec3::ZERO, 2.0, &ray, RAY_T).unwrap();

        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!(hit.backface);
        // Normal faces back toward the ray origin
        assert!((hit.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_negative_radius_inverts_backface_only() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let outside = intersect(Vec3::new(0.0, 0.0, 5.0), -1.0, &ray, RAY_T).unwrap();
        assert!((outside.t - 4.0).abs() < 1e-5);
        assert!(outside.backface);
        assert!((outside.normal + Vec3::Z).length() < 1e-5);

        let inside = intersect(Vec3::ZERO, -1.0, &ray, RAY_T).unwrap();
        assert!(!inside.backface);
        assert!((inside.normal + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_respects_closest_so_far() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let ray_t = Interval::new(1e-4, 3.0);
        assert!(intersect(Vec3::new(0.0, 0.0, 5.0), 1.0, &ray, ray_t).is_none());
    }
}
