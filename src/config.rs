use embassy_time::Duration;

/// Number of channel slots in the reference fixture (12 stair lights and
/// 2 bed strips, rounded up).
pub const MAX_CHANNELS: usize = 16;

/// Lowest synthetic level the breathe effect dims down to
pub const BREATHE_FLOOR: u8 = 5;

/// Level change per breathe tick
pub const BREATHE_STEP: u8 = 5;

/// Timings of the effect animations
#[derive(Debug, Clone, Copy)]
pub struct EffectTimings {
    /// Half period of the blink effect
    pub blink: Duration,
    /// Delay between breathe steps
    pub breathe_step: Duration,
    /// Length of a single identify pulse (both on and off phases)
    pub identify_pulse: Duration,
    /// Dark pause after the identify pulses
    pub identify_pause: Duration,
    /// How long each random color is held
    pub random_color: Duration,
    /// Sleep of a task that has nothing to animate
    pub idle: Duration,
}

pub const DEFAULT_EFFECT_TIMINGS: EffectTimings = EffectTimings {
    blink: Duration::from_millis(500),
    breathe_step: Duration::from_millis(40),
    identify_pulse: Duration::from_millis(120),
    identify_pause: Duration::from_millis(500),
    random_color: Duration::from_millis(700),
    idle: Duration::from_millis(200),
};

/// Default time `stop` waits for an effect task to exit
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_millis(300);

/// Fixture-wide driver configuration
///
/// Supplied once at startup, not reloadable.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Power state of every channel right after init
    pub default_power: bool,
    /// Upper bound for waiting on an effect task to stop
    pub join_timeout: Duration,
    /// Seed for the random color effect (mixed with the channel index)
    pub random_seed: u64,
    pub timings: EffectTimings,
}

impl DriverConfig {
    pub const fn new(default_power: bool) -> Self {
        Self {
            default_power,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            random_seed: 0x5EED_1E57_C0FF_EE00,
            timings: DEFAULT_EFFECT_TIMINGS,
        }
    }

    #[must_use]
    pub const fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    #[must_use]
    pub const fn with_timings(mut self, timings: EffectTimings) -> Self {
        self.timings = timings;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(false)
    }
}
