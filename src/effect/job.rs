use fastrand::Rng;

use super::Effect;
use crate::{
    channel::{ChannelIndex, LightChannel},
    config::EffectTimings,
    strip::LedStrip,
};

/// Error returned when the effect task could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// All task slots are in use
    Busy,
}

/// Starts effect jobs on whatever executor the firmware runs.
///
/// On embassy this is usually a thin wrapper around `Spawner` and a task
/// pool sized to the number of channels:
///
/// ```ignore
/// #[embassy_executor::task(pool_size = MAX_CHANNELS)]
/// async fn effect_task(job: EffectJob<EspStrip>) {
///     job.run().await;
/// }
///
/// impl EffectSpawner<EspStrip> for TaskSpawner {
///     fn spawn(&self, job: EffectJob<EspStrip>) -> Result<(), SpawnError> {
///         self.0.spawn(effect_task(job)).map_err(|_| SpawnError::Busy)
///     }
/// }
/// ```
pub trait EffectSpawner<S: 'static> {
    fn spawn(&self, job: EffectJob<S>) -> Result<(), SpawnError>;
}

/// Background animation of one channel
///
/// Runs until the channel's cancellation token fires. The effect kind is
/// re-read every tick, so a new `start` takes over without a restart.
pub struct EffectJob<S: 'static> {
    channel: &'static LightChannel<S>,
    index: ChannelIndex,
    timings: EffectTimings,
    rng: Rng,
}

impl<S: LedStrip + 'static> EffectJob<S> {
    pub(crate) fn new(
        channel: &'static LightChannel<S>,
        index: ChannelIndex,
        timings: EffectTimings,
        seed: u64,
    ) -> Self {
        Self {
            channel,
            index,
            timings,
            rng: Rng::with_seed(seed),
        }
    }

    /// Channel this job animates
    pub const fn index(&self) -> ChannelIndex {
        self.index
    }

    /// Run the effect loop until cancelled
    pub async fn run(mut self) {
        log!("[effect] channel {} task started", self.index.get());
        loop {
            self.animate().await;
            if !self.channel.task().exit() {
                break;
            }
            log!("[effect] channel {} restarted while exiting", self.index.get());
        }
        log!("[effect] channel {} task exited", self.index.get());
    }

    async fn animate(&mut self) {
        let channel = self.channel;
        let token = channel.task().token();
        let state = channel.state();
        let mut kind = state.effect;
        let mut slot = kind.to_slot(state.level);

        while !token.is_cancelled() {
            let state = channel.state();
            if state.effect != kind {
                kind = state.effect;
                slot = kind.to_slot(state.level);
            }
            let delay = slot.tick(channel, &self.timings, &mut self.rng);
            if token.sleep(delay).await {
                break;
            }
        }
    }
}

impl<S: 'static> core::fmt::Debug for EffectJob<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectJob")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
