mod hsv;
mod kelvin;
mod xy;

use smart_leds::RGB8;
use smart_leds::hsv::Hsv as HSV;

pub use hsv::{hsv2rgb, hue_sat_to_rgb};
pub use kelvin::{MIRED_MAX, MIRED_MIN, kelvin_to_rgb, mired_to_rgb};
pub use xy::{XY_EPSILON, xy_to_rgb, zcl_xy_to_rgb};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Quantize a unit-range component to 8 bits, truncating.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
