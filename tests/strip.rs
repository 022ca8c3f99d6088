mod tests {
    use myrtio_light_channels::strip::SmartLedsStripError;
    use myrtio_light_channels::{LedStrip, Rgb, SmartLedsStrip};
    use smart_leds::SmartLedsWrite;

    /// Writer that remembers what it was asked to send
    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<Vec<Rgb>>,
        fail: bool,
    }

    impl SmartLedsWrite for RecordingWriter {
        type Error = &'static str;
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err("bus error");
            }
            self.writes.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    #[test]
    fn test_pixels_are_buffered_until_refresh() {
        let mut strip: SmartLedsStrip<_, 8> = SmartLedsStrip::new(RecordingWriter::default(), 3);
        strip.set_pixel(0, Rgb::new(1, 2, 3)).unwrap();
        strip.set_pixel(2, Rgb::new(4, 5, 6)).unwrap();
        assert!(strip.writer().writes.is_empty());

        strip.refresh().unwrap();
        assert_eq!(
            strip.writer().writes,
            vec![vec![Rgb::new(1, 2, 3), Rgb::new(0, 0, 0), Rgb::new(4, 5, 6)]]
        );
    }

    #[test]
    fn test_out_of_range_pixel() {
        let mut strip: SmartLedsStrip<_, 8> = SmartLedsStrip::new(RecordingWriter::default(), 3);
        assert_eq!(
            strip.set_pixel(3, Rgb::new(1, 1, 1)),
            Err(SmartLedsStripError::OutOfRange(3))
        );
    }

    #[test]
    fn test_led_count_is_capped() {
        let strip: SmartLedsStrip<_, 4> = SmartLedsStrip::new(RecordingWriter::default(), 60);
        assert_eq!(strip.frame().len(), 4);
    }

    #[test]
    fn test_write_error_is_reported() {
        let writer = RecordingWriter {
            fail: true,
            ..RecordingWriter::default()
        };
        let mut strip: SmartLedsStrip<_, 2> = SmartLedsStrip::new(writer, 2);
        assert_eq!(strip.refresh(), Err(SmartLedsStripError::Write("bus error")));
    }
}
