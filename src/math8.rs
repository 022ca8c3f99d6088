use crate::color::Rgb;

/// Dim an 8-bit value by `level / 255`, truncating.
///
/// Unlike a shift-based scale this is exact at both ends:
/// `dim8(v, 255) == v` and `dim8(v, 0) == 0`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn dim8(value: u8, level: u8) -> u8 {
    ((value as u16 * level as u16) / 255) as u8
}

/// Dim all components of a color by `level / 255`
#[inline]
pub const fn dim_color(color: Rgb, level: u8) -> Rgb {
    Rgb {
        r: dim8(color.r, level),
        g: dim8(color.g, level),
        b: dim8(color.b, level),
    }
}

/// Rescale a ZCL 0-254 value onto the full 0-255 range
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn zcl_to_u8(value: u8) -> u8 {
    if value >= 254 {
        return 255;
    }
    ((value as u16 * 255) / 254) as u8
}
