//! Effect system with compile-time known effect variants
//!
//! Effects run inside a per-channel [`EffectJob`]. Each variant keeps its
//! animation state in an [`EffectSlot`], so switching effects on a running
//! job is a plain enum swap.

mod breathe;
mod identify;
mod job;

use embassy_time::Duration;
use fastrand::Rng;

pub use breathe::BreatheEffect;
pub use identify::IdentifyOkEffect;
pub use job::{EffectJob, EffectSpawner, SpawnError};

use crate::{channel::LightChannel, color::Rgb, config::EffectTimings, strip::LedStrip};

const EFFECT_NAME_NONE: &str = "none";
const EFFECT_NAME_STATIC: &str = "static";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_BREATHE: &str = "breathe";
const EFFECT_NAME_IDENTIFY_OK: &str = "identify_ok";
const EFFECT_NAME_RANDOM_COLOR: &str = "random_color";

const EFFECT_ID_NONE: u8 = 0;
const EFFECT_ID_STATIC: u8 = 1;
const EFFECT_ID_BLINK: u8 = 2;
const EFFECT_ID_BREATHE: u8 = 3;
const EFFECT_ID_IDENTIFY_OK: u8 = 4;
const EFFECT_ID_RANDOM_COLOR: u8 = 5;

pub(crate) trait Effect {
    /// Run one animation step and return how long to sleep before the next
    fn tick<S: LedStrip>(
        &mut self,
        channel: &LightChannel<S>,
        timings: &EffectTimings,
        rng: &mut Rng,
    ) -> Duration;
}

/// Known effect kinds that can be requested for a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectKind {
    /// No effect, no task
    #[default]
    None = EFFECT_ID_NONE,
    /// Solid color; the bound task only idles
    Static = EFFECT_ID_STATIC,
    Blink = EFFECT_ID_BLINK,
    Breathe = EFFECT_ID_BREATHE,
    /// Short double pulse followed by a pause
    IdentifyOk = EFFECT_ID_IDENTIFY_OK,
    RandomColor = EFFECT_ID_RANDOM_COLOR,
}

impl EffectKind {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_NONE => Self::None,
            EFFECT_ID_STATIC => Self::Static,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_BREATHE => Self::Breathe,
            EFFECT_ID_IDENTIFY_OK => Self::IdentifyOk,
            EFFECT_ID_RANDOM_COLOR => Self::RandomColor,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => EFFECT_NAME_NONE,
            Self::Static => EFFECT_NAME_STATIC,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Breathe => EFFECT_NAME_BREATHE,
            Self::IdentifyOk => EFFECT_NAME_IDENTIFY_OK,
            Self::RandomColor => EFFECT_NAME_RANDOM_COLOR,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_NONE => Some(Self::None),
            EFFECT_NAME_STATIC => Some(Self::Static),
            EFFECT_NAME_BLINK => Some(Self::Blink),
            EFFECT_NAME_BREATHE => Some(Self::Breathe),
            EFFECT_NAME_IDENTIFY_OK => Some(Self::IdentifyOk),
            EFFECT_NAME_RANDOM_COLOR => Some(Self::RandomColor),
            _ => None,
        }
    }

    pub(crate) fn to_slot(self, level: u8) -> EffectSlot {
        match self {
            Self::None | Self::Static => EffectSlot::Idle,
            Self::Blink => EffectSlot::Blink,
            Self::Breathe => EffectSlot::Breathe(BreatheEffect::new(level)),
            Self::IdentifyOk => EffectSlot::IdentifyOk(IdentifyOkEffect::new()),
            Self::RandomColor => EffectSlot::RandomColor,
        }
    }
}

/// Effect slot - enum containing the animation state of every effect
#[derive(Debug, Clone)]
pub(crate) enum EffectSlot {
    Idle,
    Blink,
    Breathe(BreatheEffect),
    IdentifyOk(IdentifyOkEffect),
    RandomColor,
}

impl Effect for EffectSlot {
    fn tick<S: LedStrip>(
        &mut self,
        channel: &LightChannel<S>,
        timings: &EffectTimings,
        rng: &mut Rng,
    ) -> Duration {
        match self {
            Self::Idle => timings.idle,
            Self::Blink => {
                channel.update_and_render(|state| {
                    state.power = !state.power;
                    true
                });
                timings.blink
            }
            Self::Breathe(effect) => effect.tick(channel, timings, rng),
            Self::IdentifyOk(effect) => effect.tick(channel, timings, rng),
            Self::RandomColor => {
                let color = Rgb::new(rng.u8(..), rng.u8(..), rng.u8(..));
                channel.update_and_render(|state| {
                    state.color = color;
                    true
                });
                timings.random_color
            }
        }
    }
}
