//! Cooperative cancellation for effect tasks
//!
//! Every channel owns one [`CancelToken`] and one task binding. The token is
//! handed to the effect job at spawn time; `stop` cancels it and then waits on
//! the exit signal with a real timeout.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer, with_timeout};

/// Result of waiting for an effect task to exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No task was bound to the channel
    NotRunning,
    /// The task observed the cancellation and exited
    Joined,
    /// The task did not exit in time and may still be running
    TimedOut,
}

/// Cancellation flag with a wakeup for tasks sleeping on it
pub struct CancelToken {
    cancelled: AtomicBool,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            wake: Signal::new(),
        }
    }

    /// Request cancellation and wake the sleeping task, if any
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.wake.signal(());
    }

    /// Arm the token again for the next activation
    pub fn reset(&self) {
        self.wake.reset();
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            self.wake.wait().await;
        }
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `true` if the token was cancelled.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match select(Timer::after(duration), self.cancelled()).await {
            Either::First(()) => self.is_cancelled(),
            Either::Second(()) => true,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Binding between a channel and its (at most one) effect task
pub(crate) struct TaskBinding {
    bound: AtomicBool,
    token: CancelToken,
    exited: Signal<CriticalSectionRawMutex, ()>,
}

impl TaskBinding {
    pub(crate) const fn new() -> Self {
        Self {
            bound: AtomicBool::new(false),
            token: CancelToken::new(),
            exited: Signal::new(),
        }
    }

    pub(crate) const fn token(&self) -> &CancelToken {
        &self.token
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    /// Claim the binding for a new task.
    ///
    /// Returns `false` if a task is already bound.
    pub(crate) fn try_bind(&self) -> bool {
        let claimed = self
            .bound
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if claimed {
            self.exited.reset();
        }
        claimed
    }

    /// Drop a claim that never got a running task
    pub(crate) fn release(&self) {
        self.bound.store(false, Ordering::Release);
    }

    /// Called by the task on its way out.
    ///
    /// Returns `true` if the task must keep running because a restart arrived
    /// while it was exiting and no other task took over.
    pub(crate) fn exit(&self) -> bool {
        // Unbind before signalling so a joined caller never sees a stale binding
        self.bound.store(false, Ordering::Release);
        self.exited.signal(());
        if self.token.is_cancelled() {
            return false;
        }
        self.try_bind()
    }

    /// Cancel the bound task and wait up to `timeout` for it to exit
    pub(crate) async fn cancel_and_join(&self, timeout: Duration) -> JoinOutcome {
        if !self.is_bound() {
            return JoinOutcome::NotRunning;
        }
        self.token.cancel();
        match with_timeout(timeout, self.exited.wait()).await {
            Ok(()) => JoinOutcome::Joined,
            Err(_) => JoinOutcome::TimedOut,
        }
    }
}
