//! Multi-channel fixture driver
//!
//! Owns the channel table and is the single entry point for state changes
//! and effect control. The table is filled once by [`FixtureDriver::init`];
//! everything else addresses channels through a [`ChannelIndex`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::once_lock::OnceLock;
use embassy_time::Duration;
use heapless::Vec;

use crate::cancel::JoinOutcome;
use crate::channel::{ChannelIndex, ChannelSnapshot, LightChannel};
use crate::color::{Rgb, hue_sat_to_rgb, mired_to_rgb, zcl_xy_to_rgb};
use crate::config::{DriverConfig, MAX_CHANNELS};
use crate::effect::{EffectJob, EffectKind, EffectSpawner, SpawnError};
use crate::strip::{ChannelConfig, LedStrip, StripFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// `init` has not run yet
    NotInitialized,
    /// Index does not address a channel of this driver
    UnknownChannel,
    /// CIE `y` too close to zero to convert
    DegenerateChromaticity,
    /// The effect task could not be spawned
    Spawn(SpawnError),
}

impl From<SpawnError> for DriverError {
    fn from(error: SpawnError) -> Self {
        Self::Spawn(error)
    }
}

/// Fixture driver - the main orchestrator
///
/// Meant to live in a `static` (or `StaticCell`), effect jobs borrow their
/// channel for `'static`.
pub struct FixtureDriver<S: 'static, P, const N: usize = MAX_CHANNELS> {
    config: DriverConfig,
    spawner: P,
    init_lock: Mutex<CriticalSectionRawMutex, ()>,
    channels: OnceLock<Vec<LightChannel<S>, N>>,
}

impl<S, P, const N: usize> FixtureDriver<S, P, N>
where
    S: LedStrip + 'static,
    P: EffectSpawner<S>,
{
    pub const fn new(config: DriverConfig, spawner: P) -> Self {
        Self {
            config,
            spawner,
            init_lock: Mutex::new(()),
            channels: OnceLock::new(),
        }
    }

    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub const fn spawner(&self) -> &P {
        &self.spawner
    }

    /// Bring up the hardware of every configured channel.
    ///
    /// Runs once: later calls only return the existing channel count.
    /// Entries beyond the capacity `N` are dropped. A channel whose hardware
    /// fails to come up stays in the table, disabled, and init carries on
    /// with the rest.
    pub async fn init<F>(&self, factory: &mut F, configs: &[ChannelConfig]) -> usize
    where
        F: StripFactory<Strip = S>,
    {
        let _guard = self.init_lock.lock().await;
        if let Some(channels) = self.channels.try_get() {
            log!("[driver] already initialized ({} channels)", channels.len());
            return channels.len();
        }
        if configs.is_empty() {
            log!("[driver] no channels configured, staying uninitialized");
            return 0;
        }
        if configs.len() > N {
            log!(
                "[driver] requested {} channels, limiting to {}",
                configs.len(),
                N
            );
        }

        let mut channels: Vec<LightChannel<S>, N> = Vec::new();
        for (index, config) in configs.iter().take(N).enumerate() {
            let strip = match factory.bring_up(config) {
                Ok(strip) => {
                    log!(
                        "[driver] channel {} init OK (address {}, leds {})",
                        index,
                        config.address,
                        config.led_count
                    );
                    Some(strip)
                }
                Err(error) => {
                    log!(
                        "[driver] channel {} init FAILED (address {}): {:?}",
                        index,
                        config.address,
                        error
                    );
                    None
                }
            };
            let channel = LightChannel::new(*config, strip, self.config.default_power);
            channel.render();
            if channels.push(channel).is_err() {
                break;
            }
        }

        let count = channels.len();
        if self.channels.init(channels).is_err() {
            log!("[driver] channel table was published concurrently");
        }
        count
    }

    pub fn is_initialized(&self) -> bool {
        self.channels.try_get().is_some()
    }

    /// Number of channels in the table, disabled ones included
    pub fn channel_count(&self) -> usize {
        self.channels.try_get().map_or(0, |channels| channels.len())
    }

    /// Look up a channel by its logical number
    pub fn channel_index(&self, raw: usize) -> Option<ChannelIndex> {
        (raw < self.channel_count()).then_some(ChannelIndex::new(raw))
    }

    pub fn channel_indices(&self) -> impl Iterator<Item = ChannelIndex> + use<S, P, N> {
        (0..self.channel_count()).map(ChannelIndex::new)
    }

    pub fn snapshot(&self, ch: ChannelIndex) -> Result<ChannelSnapshot, DriverError> {
        Ok(self.channel(ch)?.snapshot())
    }

    pub fn set_power(&self, ch: ChannelIndex, power: bool) -> Result<(), DriverError> {
        self.channel(ch)?.update_and_render(|state| {
            state.power = power;
            true
        });
        Ok(())
    }

    pub fn set_level(&self, ch: ChannelIndex, level: u8) -> Result<(), DriverError> {
        self.channel(ch)?.update_and_render(|state| {
            state.level = level;
            state.power
        });
        Ok(())
    }

    pub fn set_rgb(&self, ch: ChannelIndex, color: Rgb) -> Result<(), DriverError> {
        self.channel(ch)?.set_color(color);
        Ok(())
    }

    /// Set the color from ZCL fixed-point CIE xy coordinates.
    ///
    /// Degenerate coordinates (`y` close to zero) leave the channel untouched.
    pub fn set_xy(&self, ch: ChannelIndex, x: u16, y: u16) -> Result<(), DriverError> {
        let channel = self.channel(ch)?;
        let color = zcl_xy_to_rgb(x, y).ok_or(DriverError::DegenerateChromaticity)?;
        channel.set_color(color);
        Ok(())
    }

    pub fn set_hue_sat(&self, ch: ChannelIndex, hue: u8, sat: u8) -> Result<(), DriverError> {
        self.channel(ch)?.set_color(hue_sat_to_rgb(hue, sat));
        Ok(())
    }

    pub fn set_color_temperature(&self, ch: ChannelIndex, mired: u16) -> Result<(), DriverError> {
        self.channel(ch)?.set_color(mired_to_rgb(mired));
        Ok(())
    }

    /// Start an effect on a channel.
    ///
    /// `EffectKind::None` stops the running effect instead. If a task is
    /// already bound to the channel it picks up the new kind on its next
    /// tick, no second task is spawned.
    pub async fn start_effect(
        &'static self,
        ch: ChannelIndex,
        kind: EffectKind,
    ) -> Result<(), DriverError> {
        let channel = self.channel(ch)?;
        let _control = channel.control().lock().await;
        if kind == EffectKind::None {
            Self::stop_locked(channel, ch, self.config.join_timeout).await;
            return Ok(());
        }

        channel.update(|state| state.effect = kind);

        let task = channel.task();
        task.token().reset();
        if !task.try_bind() {
            log!("[driver] channel {} effect -> {}", ch.get(), kind.as_str());
            return Ok(());
        }

        let job = EffectJob::new(channel, ch, self.config.timings, self.seed_for(ch));
        if let Err(error) = self.spawner.spawn(job) {
            task.release();
            channel.update(|state| state.effect = EffectKind::None);
            log!("[driver] channel {} effect spawn failed: {:?}", ch.get(), error);
            return Err(error.into());
        }
        log!("[driver] channel {} effect {} started", ch.get(), kind.as_str());
        Ok(())
    }

    /// Stop the effect on a channel and wait for its task to exit.
    ///
    /// Whatever the outcome, the channel ends with no effect, powered on, at
    /// its last color. A `TimedOut` task may still render once more.
    pub async fn stop_effect(&self, ch: ChannelIndex) -> Result<JoinOutcome, DriverError> {
        let channel = self.channel(ch)?;
        let _control = channel.control().lock().await;
        Ok(Self::stop_locked(channel, ch, self.config.join_timeout).await)
    }

    /// Stop with the channel's control lock already held
    async fn stop_locked(
        channel: &LightChannel<S>,
        ch: ChannelIndex,
        timeout: Duration,
    ) -> JoinOutcome {
        let outcome = channel.task().cancel_and_join(timeout).await;
        if outcome == JoinOutcome::TimedOut {
            log!("[driver] channel {} effect task did not stop in time", ch.get());
        }
        channel.update_and_render(|state| {
            state.effect = EffectKind::None;
            state.power = true;
            true
        });
        outcome
    }

    fn channel(&self, ch: ChannelIndex) -> Result<&LightChannel<S>, DriverError> {
        self.channels
            .try_get()
            .ok_or(DriverError::NotInitialized)?
            .get(ch.get())
            .ok_or(DriverError::UnknownChannel)
    }

    fn seed_for(&self, ch: ChannelIndex) -> u64 {
        self.config.random_seed ^ (ch.get() as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}
