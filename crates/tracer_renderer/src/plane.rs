//! Ray-plane intersection.

use tracer_math::{Interval, Ray, Vec3};

use crate::SurfaceHit;

/// Below this |dot(direction, normal)| the ray is treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Intersect `ray` with the plane through `position` with unit `normal`.
///
/// Approaching from behind flips the normal and sets the backface flag.
pub fn intersect(position: Vec3, normal: Vec3, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let divisor = ray.direction.dot(normal);
    if divisor.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (position - ray.origin).dot(normal) / divisor;
    if !ray_t.surrounds(t) {
        return None;
    }

    let backface = divisor > 0.0;
    Some(SurfaceHit {
        t,
        point: ray.at(t),
        normal: if backface { -normal } else { normal },
        backface,
    })
}
