mod tests {
    use myrtio_light_channels::EffectKind;
    use myrtio_light_channels::effect::BreatheEffect;

    const ALL: [EffectKind; 6] = [
        EffectKind::None,
        EffectKind::Static,
        EffectKind::Blink,
        EffectKind::Breathe,
        EffectKind::IdentifyOk,
        EffectKind::RandomColor,
    ];

    #[test]
    fn test_effect_kind_from_raw() {
        for kind in ALL {
            assert_eq!(EffectKind::from_raw(kind as u8), Some(kind));
        }
        assert_eq!(EffectKind::from_raw(6), None);
        assert_eq!(EffectKind::from_raw(u8::MAX), None);
    }

    #[test]
    fn test_effect_kind_names() {
        assert_eq!(EffectKind::IdentifyOk.as_str(), "identify_ok");
        assert_eq!(
            EffectKind::parse_from_str("random_color"),
            Some(EffectKind::RandomColor)
        );
        for kind in ALL {
            assert_eq!(EffectKind::parse_from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EffectKind::parse_from_str("rainbow"), None);
    }

    #[test]
    fn test_effect_kind_default_is_none() {
        assert_eq!(EffectKind::default(), EffectKind::None);
    }

    #[test]
    fn test_breathe_walks_between_floor_and_peak() {
        let mut breathe = BreatheEffect::new(20);
        let levels: Vec<u8> = (0..8).map(|_| breathe.step(20)).collect();
        assert_eq!(levels, [20, 15, 10, 5, 10, 15, 20, 15]);
    }

    #[test]
    fn test_breathe_never_wraps() {
        let mut breathe = BreatheEffect::new(253);
        assert_eq!(breathe.step(255), 255);
        assert_eq!(breathe.step(255), 250);

        let mut breathe = BreatheEffect::new(6);
        assert_eq!(breathe.step(255), 11);
        let mut breathe = BreatheEffect::new(0);
        assert_eq!(breathe.level(), 1);
        assert_eq!(breathe.step(255), 6);
    }

    #[test]
    fn test_breathe_follows_lowered_peak() {
        let mut breathe = BreatheEffect::new(200);
        assert_eq!(breathe.step(100), 100);
        assert_eq!(breathe.step(100), 95);
    }
}
