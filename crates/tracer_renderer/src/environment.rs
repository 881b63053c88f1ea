//! Radiance for rays that escape the scene.

use std::sync::Arc;

use tracer_core::{EnvironmentMap, Scene, Sky};
use tracer_math::{Color, Vec3};

/// What a ray sees once it leaves the scene.
#[derive(Clone, Debug)]
pub enum Environment {
    /// Vertical blend between two colors
    Gradient { horizon: Color, zenith: Color },
    /// Cube-cross skybox
    CubeCross(Arc<EnvironmentMap>),
}

impl Environment {
    /// The scene's skybox when it has one, otherwise its sky gradient.
    pub fn for_scene(scene: &Scene) -> Self {
        match scene.environment() {
            Some(map) => Environment::CubeCross(Arc::clone(map)),
            None => Environment::from(scene.sky),
        }
    }

    /// Color seen along unit `direction`.
    pub fn sample(&self, direction: Vec3) -> Color {
        match self {
            Environment::Gradient { horizon, zenith } => sky_gradient(direction, *horizon, *zenith),
            Environment::CubeCross(map) => {
                let (x, y) = cube_cross_texel(direction, map.cell_size());
                map.color(x, y)
            }
        }
    }
}

impl From<Sky> for Environment {
    fn from(sky: Sky) -> Self {
        Environment::Gradient {
            horizon: sky.horizon,
            zenith: sky.zenith,
        }
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(direction: Vec3, horizon: Color, zenith: Color) -> Color {
    let t = 0.5 * (direction.y + 1.0);
    horizon * (1.0 - t) + zenith * t
}

/// Face of the cube a direction leaves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    /// Face selected by the largest absolute component. Ties go to x, then y.
    pub fn from_direction(direction: Vec3) -> Self {
        let a = direction.abs();
        if a.x >= a.y && a.x >= a.z {
            if direction.x > 0.0 {
                CubeFace::PosX
            } else {
                CubeFace::NegX
            }
        } else if a.y >= a.z {
            if direction.y > 0.0 {
                CubeFace::PosY
            } else {
                CubeFace::NegY
            }
        } else if direction.z > 0.0 {
            CubeFace::PosZ
        } else {
            CubeFace::NegZ
        }
    }

    /// Cell index in the 4x3 cross, counted row-major from the top left.
    pub fn cell(self) -> u32 {
        match self {
            CubeFace::PosY => 1,
            CubeFace::PosZ => 4,
            CubeFace::PosX => 5,
            CubeFace::NegZ => 6,
            CubeFace::NegX => 7,
            CubeFace::NegY => 9,
        }
    }

    /// Face coordinates of `direction` in [-1, 1].
    fn project(self, d: Vec3) -> (f32, f32) {
        match self {
            CubeFace::PosX | CubeFace::NegX => (-d.z / d.x, -d.y / d.x.abs()),
            CubeFace::PosY | CubeFace::NegY => (-d.z / d.y.abs(), d.x / d.y),
            CubeFace::PosZ | CubeFace::NegZ => (d.x / d.z, -d.y / d.z.abs()),
        }
    }
}

/// Pixel coordinates (row 0 at the top) sampled for `direction` in a
/// cube-cross image whose faces are `cell_size` pixels square.
pub fn cube_cross_texel(direction: Vec3, cell_size: u32) -> (u32, u32) {
    let face = CubeFace::from_direction(direction);
    let (u, v) = face.project(direction);

    let last = cell_size.saturating_sub(1);
    let to_pixel = |c: f32| (((c + 1.0) * 0.5 * cell_size as f32) as u32).min(last);

    let cell = face.cell();
    let x = (cell % 4) * cell_size + to_pixel(u);
    let y = (cell / 4) * cell_size + to_pixel(v);
    (x, y)
}
