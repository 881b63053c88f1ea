//! Per-cell rendering.
//!
//! A cell is one pixel of the working image. It covers a square block of
//! output pixels whose side is the current fragment size, clipped at the
//! right and bottom edges of the image.

use tracer_core::Scene;
use tracer_math::{linear_to_gamma, pack_rgb, Color, Vec2};

use crate::progressive::DEFAULT_START_FRAGMENT_SIZE;
use crate::{trace, Camera, Lcg, DEFAULT_BAND_HEIGHT};

/// How surfaces are lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingMode {
    /// Follow material scattering until the ray escapes
    #[default]
    PathTrace,
    /// Single sun plus ambient floor, one shadow ray per primary hit
    ShadowTest,
}

/// Where inside a cell the sample rays pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jitter {
    /// Every sample through the cell center
    #[default]
    Center,
    /// Fixed offsets derived from the cell coordinates and sample index
    Pattern,
    /// Offsets drawn from the scene generator
    Random,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Rays traced per working cell
    pub samples_per_cell: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Minimum hit distance, guards against self-intersection
    pub epsilon: f32,
    pub lighting: LightingMode,
    pub jitter: Jitter,
    /// Apply gamma 2 before packing
    pub gamma: bool,
    /// Fragment size used after every reset
    pub start_fragment_size: u32,
    /// Working rows rendered per band
    pub band_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_cell: 1,
            max_depth: 50,
            epsilon: 1e-4,
            lighting: LightingMode::PathTrace,
            jitter: Jitter::Center,
            gamma: true,
            start_fragment_size: DEFAULT_START_FRAGMENT_SIZE,
            band_height: DEFAULT_BAND_HEIGHT,
        }
    }
}

impl Jitter {
    /// Offset in [0, 1)^2 of sample `index` within cell (`cx`, `cy`).
    fn offset(self, cx: u32, cy: u32, index: u32, rng: &mut Lcg) -> Vec2 {
        match self {
            Jitter::Center => Vec2::splat(0.5),
            Jitter::Pattern => {
                let angle = cx as f32 * 0.7 + cy as f32 * 1.3 + index as f32 * 2.399;
                Vec2::new(0.5 + 0.4 * angle.sin(), 0.5 + 0.4 * angle.cos())
            }
            Jitter::Random => {
                let x = rng.next_f32();
                let y = rng.next_f32();
                Vec2::new(x, y)
            }
        }
    }
}

/// Render working cell (`cx`, `cy`) and return its packed output color.
///
/// Samples are placed inside the output block the cell covers, so edge
/// cells that are clipped by the image only sample their visible part.
pub fn render_cell(
    scene: &Scene,
    camera: &Camera,
    cx: u32,
    cy: u32,
    fragment_size: u32,
    config: &RenderConfig,
    rng: &mut Lcg,
) -> u32 {
    let x0 = cx * fragment_size;
    let y0 = cy * fragment_size;
    let x1 = (x0 + fragment_size).min(camera.image_width);
    let y1 = (y0 + fragment_size).min(camera.image_height);
    let extent = Vec2::new(x1.saturating_sub(x0) as f32, y1.saturating_sub(y0) as f32);

    let samples = config.samples_per_cell.max(1);
    let mut cell_color = Color::ZERO;

    for index in 0..samples {
        let offset = config.jitter.offset(cx, cy, index, rng);
        let point = Vec2::new(x0 as f32, y0 as f32) + offset * extent;
        let ray = camera.ray_through(point.x, point.y);
        cell_color += trace(scene, &ray, config.max_depth, config, rng);
    }

    // Average the samples
    cell_color /= samples as f32;

    if config.gamma {
        cell_color = Color::new(
            linear_to_gamma(cell_color.x),
            linear_to_gamma(cell_color.y),
            linear_to_gamma(cell_color.z),
        );
    }

    pack_rgb(cell_color)
}
