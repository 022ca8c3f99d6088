//! CIE 1931 xy chromaticity to sRGB
//!
//! The luminance is fixed at `Y = 1`; brightness is applied later by the
//! renderer through the channel level.

use super::{Rgb, unit_to_u8};

/// Smallest `y` accepted. Anything below would divide by (almost) zero.
pub const XY_EPSILON: f32 = 0.000_01;

/// Full scale of the ZCL `CurrentX`/`CurrentY` attributes
const ZCL_XY_SCALE: f32 = 65535.0;

/// XYZ to linear sRGB (D65)
const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [3.240_479, -1.537_150, -0.498_535],
    [-0.969_256, 1.875_992, 0.041_556],
    [0.055_648, -0.204_043, 1.057_311],
];

/// Convert a chromaticity coordinate to an RGB color
///
/// Returns `None` for degenerate coordinates (`y < XY_EPSILON`).
/// Colors outside the gamut are clamped per component.
pub fn xy_to_rgb(x: f32, y: f32) -> Option<Rgb> {
    if y < XY_EPSILON {
        return None;
    }
    let xyz = [x / y, 1.0, (1.0 - x - y) / y];
    let [r, g, b] = XYZ_TO_RGB.map(|row| row[0] * xyz[0] + row[1] * xyz[1] + row[2] * xyz[2]);

    Some(Rgb {
        r: unit_to_u8(r),
        g: unit_to_u8(g),
        b: unit_to_u8(b),
    })
}

/// Same as [`xy_to_rgb`] for ZCL fixed-point coordinates (`value / 65535`)
#[allow(clippy::cast_lossless)]
pub fn zcl_xy_to_rgb(x: u16, y: u16) -> Option<Rgb> {
    xy_to_rgb(x as f32 / ZCL_XY_SCALE, y as f32 / ZCL_XY_SCALE)
}
