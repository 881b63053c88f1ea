//! Packed output pixels.

/// Row-major `0x00RRGGBB` pixels at the output resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Resize, clearing to black when the size changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    /// Get the packed pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    /// Fill a `size x size` block with its top-left corner at (x, y),
    /// clipped to the image.
    pub fn fill_block(&mut self, x: u32, y: u32, size: u32, packed: u32) {
        if x >= self.width {
            return;
        }
        let x_end = x.saturating_add(size).min(self.width);
        let y_end = y.saturating_add(size).min(self.height);

        for row in y..y_end {
            let start = self.index(x, row);
            let end = start + (x_end - x) as usize;
            self.pixels[start..end].fill(packed);
        }
    }

    /// One packed row.
    pub fn row(&self, y: u32) -> &[u32] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for packed in &self.pixels {
            let [_, r, g, b] = packed.to_be_bytes();
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
