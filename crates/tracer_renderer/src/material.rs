//! Surface scattering for the scene's material descriptors.

use tracer_core::Material;
use tracer_math::{Color, Vec3};

use crate::Lcg;

/// Components below this count as zero when checking a diffuse bounce.
const DEGENERATE_EPSILON: f32 = 1e-4;

/// Material factor applied by diffuse and metallic surfaces.
const ALBEDO: f32 = 0.5;

/// Outcome of a scattering event that continues the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scattered {
    /// Unit direction of the outgoing ray
    pub direction: Vec3,
    /// Material factor; the integrator multiplies it by the surface color
    pub attenuation: Color,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Scatter {
    /// Scatter a ray arriving along unit `incoming` at a surface with unit
    /// `normal` facing the ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, normal: Vec3, incoming: Vec3, backface: bool, rng: &mut Lcg)
        -> Option<Scattered>;
}

impl Scatter for Material {
    fn scatter(
        &self,
        normal: Vec3,
        incoming: Vec3,
        backface: bool,
        rng: &mut Lcg,
    ) -> Option<Scattered> {
        match *self {
            Material::Lambertian => Some(lambertian(normal, rng)),
            Material::Metal { fuzz } => metal(normal, incoming, fuzz, rng),
            Material::Dielectric { refractive_index } => {
                Some(dielectric(normal, incoming, backface, refractive_index, rng))
            }
        }
    }
}

fn lambertian(normal: Vec3, rng: &mut Lcg) -> Scattered {
    let mut direction = (normal + rng.in_unit_sphere().normalize_or_zero()).normalize_or_zero();

    // Catch degenerate scatter direction
    if direction.abs().cmplt(Vec3::splat(DEGENERATE_EPSILON)).all() {
        direction = normal;
    }

    Scattered {
        direction,
        attenuation: Color::splat(ALBEDO),
    }
}

fn metal(normal: Vec3, incoming: Vec3, fuzz: f32, rng: &mut Lcg) -> Option<Scattered> {
    // The sample is drawn even for perfect mirrors so the sequence does not depend on fuzz
    let jitter = rng.in_unit_sphere().normalize_or_zero();
    let direction = (reflect(incoming, normal) + fuzz * jitter).normalize_or_zero();

    // Only scatter if the reflected ray is in the same hemisphere as the normal
    (direction.dot(normal) > 0.0).then_some(Scattered {
        direction,
        attenuation: Color::splat(ALBEDO),
    })
}

fn dielectric(
    normal: Vec3,
    incoming: Vec3,
    backface: bool,
    refractive_index: f32,
    rng: &mut Lcg,
) -> Scattered {
    let ratio = if backface {
        refractive_index
    } else {
        1.0 / refractive_index
    };

    let cos_theta = (-incoming).dot(normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    // Check for total internal reflection
    let cannot_refract = ratio * sin_theta > 1.0;

    let direction = if cannot_refract || reflectance(cos_theta, ratio) > rng.next_f32() {
        reflect(incoming, normal)
    } else {
        refract(incoming, normal, ratio)
    };

    Scattered {
        direction: direction.normalize_or_zero(),
        attenuation: Color::ONE,
    }
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
