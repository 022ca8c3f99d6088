use super::Rgb;

/// Coolest supported color temperature in mireds (~6500K)
pub const MIRED_MIN: u16 = 153;
/// Warmest supported color temperature in mireds (2000K)
pub const MIRED_MAX: u16 = 500;

/// Convert a color temperature in mireds to an RGB color
///
/// Input is clamped to `MIRED_MIN..=MIRED_MAX`, never rejected.
#[allow(clippy::cast_lossless)]
pub fn mired_to_rgb(mired: u16) -> Rgb {
    let mired = mired.clamp(MIRED_MIN, MIRED_MAX);
    black_body(1_000_000.0 / mired as f32)
}

/// Convert a Kelvin temperature to an RGB color
///
/// Supports temperatures between 1000K and 40000K.
#[allow(clippy::cast_lossless)]
pub fn kelvin_to_rgb(kelvin: u16) -> Rgb {
    black_body((kelvin as f32).clamp(1000.0, 40000.0))
}

/// Empirical black-body fit, one curve per component, branching at 6600K.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn black_body(kelvin: f32) -> Rgb {
    let temp = kelvin / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_73 * libm::powf(temp - 60.0, -0.133_204_76)
    }
    .clamp(0.0, 255.0);

    let green = if temp <= 66.0 {
        99.470_8 * libm::logf(temp) - 161.119_57
    } else {
        288.122_17 * libm::powf(temp - 60.0, -0.075_514_85)
    }
    .clamp(0.0, 255.0);

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_73 * libm::logf(temp - 10.0) - 305.044_8
    }
    .clamp(0.0, 255.0);

    Rgb {
        r: red as u8,
        g: green as u8,
        b: blue as u8,
    }
}
