pub use smart_leds::hsv::hsv2rgb;

use crate::{
    color::{Hsv, Rgb},
    math8::zcl_to_u8,
};

/// Convert ZCL hue and saturation to an RGB color at full value.
///
/// Both inputs use the ZCL range: hue 0-254 covers the whole color wheel,
/// saturation 0-254 goes from white to the pure hue.
pub fn hue_sat_to_rgb(hue: u8, sat: u8) -> Rgb {
    hsv2rgb(Hsv {
        hue: zcl_to_u8(hue),
        sat: zcl_to_u8(sat),
        val: u8::MAX,
    })
}
