//! Linear RGB colors and their packed `0x00RRGGBB` framebuffer form.

use crate::{Interval, Vec3};

/// Color type alias (linear RGB, typically 0-1).
pub type Color = Vec3;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Pack a color into `0x00RRGGBB`, clamping each channel to [0, 1].
pub fn pack_rgb(color: Color) -> u32 {
    let to_byte = |c: f32| (255.0 * Interval::UNIT.clamp(c)) as u32;
    (to_byte(color.x) << 16) | (to_byte(color.y) << 8) | to_byte(color.z)
}

/// Unpack a `0x00RRGGBB` value into a color in [0, 1]. The top byte is ignored.
pub fn unpack_rgb(packed: u32) -> Color {
    let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
    Color::new(channel(16), channel(8), channel(0))
}
