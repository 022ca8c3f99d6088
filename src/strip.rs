//! Hardware seam
//!
//! Implement [`LedStrip`] and [`StripFactory`] to support different hardware
//! platforms. The driver is generic over these traits.

use core::fmt::Debug;

use smart_leds::SmartLedsWrite;

use crate::color::Rgb;

/// Static description of one channel's hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Hardware address of the data line (GPIO number on ESP32)
    pub address: u8,
    /// Number of pixels on the strip
    pub led_count: u16,
}

impl ChannelConfig {
    pub const fn new(address: u8, led_count: u16) -> Self {
        Self { address, led_count }
    }
}

/// Buffered addressable LED strip
///
/// Pixel writes are not visible until [`LedStrip::refresh`] is called.
pub trait LedStrip {
    type Error: Debug;

    /// Set a single pixel in the output buffer
    fn set_pixel(&mut self, index: u16, color: Rgb) -> Result<(), Self::Error>;

    /// Commit the buffered pixels to the LEDs
    fn refresh(&mut self) -> Result<(), Self::Error>;
}

/// Creates the strip handle for a channel during driver init
pub trait StripFactory {
    type Strip: LedStrip;
    type Error: Debug;

    /// Bring up the hardware for one channel
    fn bring_up(&mut self, config: &ChannelConfig) -> Result<Self::Strip, Self::Error>;
}

/// Error of the [`SmartLedsStrip`] adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartLedsStripError<E> {
    /// Pixel index past the end of the strip
    OutOfRange(u16),
    /// Underlying writer failed
    Write(E),
}

/// [`LedStrip`] on top of any `smart_leds` writer
///
/// Keeps a frame buffer of `MAX_LEDS` pixels and pushes the first
/// `led_count` of them on refresh.
pub struct SmartLedsStrip<W, const MAX_LEDS: usize> {
    writer: W,
    frame_buffer: [Rgb; MAX_LEDS],
    led_count: usize,
}

impl<W, const MAX_LEDS: usize> SmartLedsStrip<W, MAX_LEDS> {
    /// Wrap a writer. `led_count` is capped to `MAX_LEDS`.
    pub fn new(writer: W, led_count: u16) -> Self {
        Self {
            writer,
            frame_buffer: [Rgb::default(); MAX_LEDS],
            led_count: usize::from(led_count).min(MAX_LEDS),
        }
    }

    /// Pixels as they will be sent on the next refresh
    pub fn frame(&self) -> &[Rgb] {
        &self.frame_buffer[..self.led_count]
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W, const MAX_LEDS: usize> LedStrip for SmartLedsStrip<W, MAX_LEDS>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    type Error = SmartLedsStripError<W::Error>;

    fn set_pixel(&mut self, index: u16, color: Rgb) -> Result<(), Self::Error> {
        let pixel = self.frame_buffer[..self.led_count]
            .get_mut(usize::from(index))
            .ok_or(SmartLedsStripError::OutOfRange(index))?;
        *pixel = color;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), Self::Error> {
        self.writer
            .write(self.frame_buffer[..self.led_count].iter().copied())
            .map_err(SmartLedsStripError::Write)
    }
}
