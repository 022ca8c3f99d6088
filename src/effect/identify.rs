use embassy_time::Duration;
use fastrand::Rng;

use super::Effect;
use crate::{channel::LightChannel, config::EffectTimings, strip::LedStrip};

/// Power state of each identify step. The last step is the long pause.
const PATTERN: [bool; 4] = [true, false, true, false];

/// "Okay" identify pattern: on, off, on, then a longer dark pause.
///
/// Every pulse is its own tick, so cancellation is observed between pulses.
#[derive(Debug, Clone)]
pub struct IdentifyOkEffect {
    step: usize,
}

impl IdentifyOkEffect {
    pub const fn new() -> Self {
        Self { step: 0 }
    }
}

impl Default for IdentifyOkEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for IdentifyOkEffect {
    fn tick<S: LedStrip>(
        &mut self,
        channel: &LightChannel<S>,
        timings: &EffectTimings,
        _rng: &mut Rng,
    ) -> Duration {
        let step = self.step;
        let power = PATTERN[step];
        channel.update_and_render(|state| {
            state.power = power;
            true
        });
        self.step = (step + 1) % PATTERN.len();

        if step == PATTERN.len() - 1 {
            timings.identify_pause
        } else {
            timings.identify_pulse
        }
    }
}
