//! Breathe effect
//!
//! Walks a synthetic level between [`BREATHE_FLOOR`] and the channel's
//! configured level, reversing at each bound.

use embassy_time::Duration;
use fastrand::Rng;

use super::Effect;
use crate::{
    channel::LightChannel,
    config::{BREATHE_FLOOR, BREATHE_STEP, EffectTimings},
    strip::LedStrip,
};

#[derive(Debug, Clone)]
pub struct BreatheEffect {
    level: u8,
    rising: bool,
}

impl BreatheEffect {
    /// Start breathing from the channel's current level
    pub const fn new(level: u8) -> Self {
        Self {
            level: if level == 0 { 1 } else { level },
            rising: true,
        }
    }

    /// Advance one step towards `peak` and return the new synthetic level
    pub fn step(&mut self, peak: u8) -> u8 {
        let mut level = if self.rising {
            self.level.saturating_add(BREATHE_STEP)
        } else {
            self.level.saturating_sub(BREATHE_STEP)
        };
        if level >= peak {
            level = peak;
            self.rising = false;
        }
        if level <= BREATHE_FLOOR {
            level = BREATHE_FLOOR;
            self.rising = true;
        }
        self.level = level;
        level
    }

    pub const fn level(&self) -> u8 {
        self.level
    }
}

impl Effect for BreatheEffect {
    fn tick<S: LedStrip>(
        &mut self,
        channel: &LightChannel<S>,
        timings: &EffectTimings,
        _rng: &mut Rng,
    ) -> Duration {
        let level = self.step(channel.state().level);
        channel.render_at_level(level);
        timings.breathe_step
    }
}
