//! Band-based rendering of the working image.
//!
//! Working rows are split into horizontal bands that are rendered top to
//! bottom, so a slow pass can be followed band by band in the logs.

use tracer_core::Scene;

use crate::{render_cell, Camera, Framebuffer, Lcg, RenderConfig};

/// Default band height in working rows.
pub const DEFAULT_BAND_HEIGHT: u32 = 50;

/// A horizontal strip of working rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First working row
    pub y: u32,
    /// Number of working rows
    pub height: u32,
    /// Index of this band in the render order
    pub index: usize,
}

impl Band {
    /// Create a new band.
    pub fn new(y: u32, height: u32, index: usize) -> Self {
        Self { y, height, index }
    }

    /// Working rows covered by this band.
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.y..self.y + self.height
    }
}

/// Split `working_height` rows into bands of at most `band_height` rows.
pub fn generate_bands(working_height: u32, band_height: u32) -> Vec<Band> {
    let band_height = band_height.max(1);
    let mut bands = Vec::new();

    let mut y = 0;
    while y < working_height {
        let height = band_height.min(working_height - y);
        bands.push(Band::new(y, height, bands.len()));
        y += band_height;
    }

    bands
}

/// Render every cell of a band into the framebuffer.
#[allow(clippy::too_many_arguments)]
pub fn render_band(
    band: &Band,
    working_width: u32,
    fragment_size: u32,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    rng: &mut Lcg,
    framebuffer: &mut Framebuffer,
) {
    for cy in band.rows() {
        for cx in 0..working_width {
            let packed = render_cell(scene, camera, cx, cy, fragment_size, config, rng);
            framebuffer.fill_block(cx * fragment_size, cy * fragment_size, fragment_size, packed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_bands_exact_fit() {
        let bands = generate_bands(100, 50);
        assert_eq!(bands, vec![Band::new(0, 50, 0), Band::new(50, 50, 1)]);
    }

    #[test]
    fn test_generate_bands_partial_fit() {
        let bands = generate_bands(120, 50);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[2], Band::new(100, 20, 2));

        // Every row covered once
        let total: u32 = bands.iter().map(|b| b.height).sum();
        assert_eq!(total, 120);
    }

    #[test]
    fn test_small_and_empty_images() {
        assert_eq!(generate_bands(3, 50), vec![Band::new(0, 3, 0)]);
        assert!(generate_bands(0, 50).is_empty());
    }

    #[test]
    fn test_render_band_fills_blocks() {
        let scene = Scene::new("empty");
        let mut camera = Camera::new().with_resolution(5, 5);
        camera.initialize();
        let mut framebuffer = Framebuffer::new(5, 5);
        let mut rng = Lcg::default();

        // Fragment 2 over 5 pixels gives a 3x3 working image
        for band in generate_bands(3, 2) {
            render_band(
                &band,
                3,
                2,
                &scene,
                &camera,
                &RenderConfig::default(),
                &mut rng,
                &mut framebuffer,
            );
        }

        assert!(framebuffer.pixels.iter().all(|&p| p != 0));
        assert_eq!(framebuffer.get(0, 0), framebuffer.get(1, 1));
        assert_eq!(framebuffer.get(2, 2), framebuffer.get(3, 3));
        assert_eq!(framebuffer.get(4, 3), framebuffer.get(4, 2));
    }
}
