//! Per-channel state slot
//!
//! Each channel keeps its state and strip behind its own critical-section
//! mutex. A lock is held for one field update plus the render it triggers,
//! so the protocol side and the channel's effect task never interleave
//! writes to the same strip.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex as AsyncMutex;

use crate::cancel::TaskBinding;
use crate::color::Rgb;
use crate::effect::EffectKind;
use crate::renderer::{fill, output_color};
use crate::strip::{ChannelConfig, LedStrip};

/// Bounds-checked index into the channel table
///
/// Only handed out by [`FixtureDriver`](crate::FixtureDriver) for channels
/// that exist, so it never needs re-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChannelIndex(usize);

impl ChannelIndex {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// Mutable part of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChannelState {
    pub(crate) color: Rgb,
    pub(crate) level: u8,
    pub(crate) power: bool,
    pub(crate) effect: EffectKind,
}

/// Read-only copy of a channel's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub color: Rgb,
    pub level: u8,
    pub power: bool,
    pub effect: EffectKind,
    pub led_count: u16,
    /// `false` if the hardware failed to come up at init
    pub enabled: bool,
}

struct ChannelCell<S> {
    state: ChannelState,
    strip: Option<S>,
}

impl<S: LedStrip> ChannelCell<S> {
    fn render_at(&mut self, led_count: u16, level: u8) {
        let Some(strip) = self.strip.as_mut() else {
            return;
        };
        let color = output_color(self.state.color, level, self.state.power);
        fill(strip, led_count, color);
    }
}

/// One addressable lighting zone
pub(crate) struct LightChannel<S> {
    config: ChannelConfig,
    enabled: bool,
    cell: Mutex<CriticalSectionRawMutex, RefCell<ChannelCell<S>>>,
    task: TaskBinding,
    /// Serializes effect start and stop, held across the join
    control: AsyncMutex<CriticalSectionRawMutex, ()>,
}

impl<S: LedStrip> LightChannel<S> {
    /// Create a channel. `strip` is `None` when bring-up failed.
    pub(crate) fn new(config: ChannelConfig, strip: Option<S>, power: bool) -> Self {
        Self {
            config,
            enabled: strip.is_some(),
            cell: Mutex::new(RefCell::new(ChannelCell {
                state: ChannelState {
                    color: Rgb::new(255, 255, 255),
                    level: u8::MAX,
                    power,
                    effect: EffectKind::None,
                },
                strip,
            })),
            task: TaskBinding::new(),
            control: AsyncMutex::new(()),
        }
    }

    pub(crate) const fn led_count(&self) -> u16 {
        self.config.led_count
    }

    pub(crate) const fn task(&self) -> &TaskBinding {
        &self.task
    }

    pub(crate) const fn control(&self) -> &AsyncMutex<CriticalSectionRawMutex, ()> {
        &self.control
    }

    pub(crate) fn state(&self) -> ChannelState {
        self.cell.lock(|cell| cell.borrow().state)
    }

    pub(crate) fn snapshot(&self) -> ChannelSnapshot {
        let state = self.state();
        ChannelSnapshot {
            color: state.color,
            level: state.level,
            power: state.power,
            effect: state.effect,
            led_count: self.config.led_count,
            enabled: self.enabled,
        }
    }

    /// Mutate the state without rendering
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ChannelState) -> R) -> R {
        self.cell.lock(|cell| f(&mut cell.borrow_mut().state))
    }

    /// Mutate the state and render if `f` reports a visible change
    pub(crate) fn update_and_render(&self, f: impl FnOnce(&mut ChannelState) -> bool) {
        let led_count = self.led_count();
        self.cell.lock(|cell| {
            let mut cell = cell.borrow_mut();
            if f(&mut cell.state) {
                let level = cell.state.level;
                cell.render_at(led_count, level);
            }
        });
    }

    /// Replace the base color, rendering only while powered
    pub(crate) fn set_color(&self, color: Rgb) {
        self.update_and_render(|state| {
            state.color = color;
            state.power
        });
    }

    /// Push the current state to the strip
    pub(crate) fn render(&self) {
        self.update_and_render(|_| true);
    }

    /// Render with a temporary level, leaving the stored level untouched.
    ///
    /// Nothing is written while the channel is off.
    pub(crate) fn render_at_level(&self, level: u8) {
        let led_count = self.led_count();
        self.cell.lock(|cell| {
            let mut cell = cell.borrow_mut();
            if cell.state.power {
                cell.render_at(led_count, level);
            }
        });
    }
}
