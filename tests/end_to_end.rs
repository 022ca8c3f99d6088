mod common;

mod tests {
    use std::time::Duration as StdDuration;

    use embassy_futures::block_on;
    use myrtio_light_channels::{ChannelConfig, EffectKind, JoinOutcome, Rgb};

    use super::common::driver_with;

    #[test]
    fn test_stair_and_bed_fixture() {
        let (driver, factory) = driver_with(false, &[
            ChannelConfig::new(4, 1),
            ChannelConfig::new(5, 60),
        ]);
        let stair = driver.channel_index(0).unwrap();
        let bed = driver.channel_index(1).unwrap();

        driver.set_power(stair, true).unwrap();
        driver.set_level(stair, 128).unwrap();
        driver.set_rgb(stair, Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(factory.probe(4).pixels(), vec![Rgb::new(128, 0, 0)]);

        let half = (0.33 * 65535.0) as u16;
        driver.set_xy(bed, half, half).unwrap();
        driver.set_power(bed, true).unwrap();
        driver.set_level(bed, 255).unwrap();
        let pixels = factory.probe(5).pixels();
        assert_eq!(pixels.len(), 60);
        for pixel in pixels {
            assert!(pixel.r >= 230 && pixel.g >= 230 && pixel.b >= 230, "{pixel:?}");
        }

        block_on(driver.start_effect(stair, EffectKind::Breathe)).unwrap();
        std::thread::sleep(StdDuration::from_millis(50));
        let outcome = block_on(driver.stop_effect(stair)).unwrap();
        assert_eq!(outcome, JoinOutcome::Joined);

        let snapshot = driver.snapshot(stair).unwrap();
        assert!(snapshot.power);
        assert_eq!(snapshot.effect, EffectKind::None);
        assert_eq!(factory.probe(4).pixels(), vec![Rgb::new(128, 0, 0)]);
    }
}
