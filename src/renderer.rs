//! Output renderer
//!
//! Turns a channel's base color, level and power into pixels and commits
//! them to the strip.

use crate::color::Rgb;
use crate::math8::dim_color;
use crate::strip::LedStrip;

/// Color actually sent to every pixel of a channel
pub const fn output_color(color: Rgb, level: u8, power: bool) -> Rgb {
    if power {
        dim_color(color, level)
    } else {
        Rgb { r: 0, g: 0, b: 0 }
    }
}

/// Fill the whole strip with `color` and commit.
///
/// The commit happens even for an all-black frame, the strip buffers writes
/// until then. Write errors are logged and the frame is still committed.
pub(crate) fn fill<S: LedStrip>(strip: &mut S, led_count: u16, color: Rgb) {
    for index in 0..led_count {
        if let Err(error) = strip.set_pixel(index, color) {
            log!("[renderer] pixel {} write failed: {:?}", index, error);
            break;
        }
    }
    if let Err(error) = strip.refresh() {
        log!("[renderer] refresh failed: {:?}", error);
    }
}
