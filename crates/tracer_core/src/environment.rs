//! Environment map loading.
//!
//! An environment map is a cube-cross skybox: a 4 cells wide, 3 cells tall
//! grid of square faces. Pixels are stored as packed `0x00RRGGBB` values,
//! row-major, top row first. The renderer decides which face and texel a
//! direction maps to; this module only owns the pixels.

use std::path::Path;

use thiserror::Error;
use tracer_math::{unpack_rgb, Color};

/// Errors that can occur during environment map loading.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Failed to open environment map {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported environment map layout {width}x{height}: expected a 4x3 cube cross")]
    UnsupportedLayout { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} pixels, expected {expected}")]
    PixelCount { expected: usize, actual: usize },
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// A decoded cube-cross environment image.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Packed `0x00RRGGBB` pixels, row-major, top to bottom
    pub pixels: Vec<u32>,

    /// Original file path (for debugging)
    pub path: String,
}

impl EnvironmentMap {
    /// Create an environment map from packed pixels, checking the cube-cross layout.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u32>,
        path: impl Into<String>,
    ) -> EnvironmentResult<Self> {
        let cell = width / 4;
        if cell == 0 || width % 4 != 0 || height < 3 * cell {
            return Err(EnvironmentError::UnsupportedLayout { width, height });
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EnvironmentError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            path: path.into(),
        })
    }

    /// Load an environment map from any format the `image` crate decodes
    /// (uncompressed true-color TGA included).
    pub fn load(path: impl AsRef<Path>) -> EnvironmentResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| EnvironmentError::Open {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
            .collect();

        let map = Self::new(width, height, pixels, path.to_string_lossy())?;
        log::debug!(
            "Loaded environment map: {} ({}x{}, {:.1} KB)",
            map.path,
            map.width,
            map.height,
            map.size_bytes() as f32 / 1024.0
        );

        Ok(map)
    }

    /// Edge length of one cube face in pixels.
    pub fn cell_size(&self) -> u32 {
        self.width / 4
    }

    /// Packed pixel at integer coordinates (row 0 is the top row).
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Pixel at integer coordinates as a color in [0, 1].
    pub fn color(&self, x: u32, y: u32) -> Color {
        unpack_rgb(self.texel(x, y))
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<u32>()
    }
}
