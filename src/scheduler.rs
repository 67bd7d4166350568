//! Step scheduler: the suspension point between algorithm steps.
//!
//! Every driver step ends in [`StepGate::wait_step`]. The production gate,
//! [`StepScheduler`], applies two gates in order:
//!
//! - **pace**: sleep for the configured delay, sampled when the call starts;
//! - **pause**: while the run is paused, re-check at the poll interval.
//!
//! Both gates are interruptible: a controller transition wakes the waiting
//! driver immediately, and a stop request ends the wait with
//! [`StepOutcome::Abort`].

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::trace;

use crate::state::RunState;

/// What the driver must do after a suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Continue with the next step.
    Proceed,
    /// Stop now without further mutations or publications.
    Abort,
}

/// A suspension point invoked after every comparison and mutation.
pub trait StepGate: Send + Sync {
    /// Block until the next step may run. Never fails.
    fn wait_step(&self) -> StepOutcome;
}

/// Gate that never waits and never aborts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

impl StepGate for Unpaced {
    fn wait_step(&self) -> StepOutcome {
        StepOutcome::Proceed
    }
}

/// Run flags shared between the controller and the worker running a driver.
#[derive(Debug)]
pub struct RunSignal {
    state: AtomicU8,
    delay_ms: AtomicU64,
    pause_poll: Duration,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl RunSignal {
    /// Create a signal in the idle state.
    #[must_use]
    pub fn new(delay_ms: u64, pause_poll: Duration) -> Self {
        // One pending token is enough: the waiter re-reads the flags anyway.
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            state: AtomicU8::new(RunState::Idle.as_u8()),
            delay_ms: AtomicU64::new(delay_ms),
            pause_poll,
            wake_tx,
            wake_rx,
        }
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Set the run state and wake a waiting driver.
    pub fn set_state(&self, state: RunState) {
        self.state.store(state.as_u8(), Ordering::Release);
        self.wake();
    }

    /// Atomically move from `current` to `new`. Returns false if the state
    /// was not `current`.
    pub fn transition(&self, current: RunState, new: RunState) -> bool {
        let swapped = self
            .state
            .compare_exchange(current.as_u8(), new.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if swapped {
            self.wake();
        }
        swapped
    }

    /// Flip between running and paused. Returns the new state, or `None`
    /// when no run is active.
    pub fn toggle_pause(&self) -> Option<RunState> {
        let flipped = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                match RunState::from_u8(raw) {
                    RunState::Running => Some(RunState::Paused.as_u8()),
                    RunState::Paused => Some(RunState::Running.as_u8()),
                    RunState::Idle | RunState::Stopped => None,
                }
            })
            .ok()?;
        self.wake();
        Some(match RunState::from_u8(flipped) {
            RunState::Running => RunState::Paused,
            _ => RunState::Running,
        })
    }

    /// Move an active run (running or paused) to `new`. Returns false if no
    /// run was active.
    pub fn leave_active(&self, new: RunState) -> bool {
        let left = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                RunState::from_u8(raw).is_active().then_some(new.as_u8())
            })
            .is_ok();
        if left {
            self.wake();
        }
        left
    }

    /// Per-step delay in effect for the next wait.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Relaxed))
    }

    /// Change the per-step delay. An in-progress wait keeps its old delay.
    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::Relaxed);
    }

    /// Interval between re-checks while paused.
    #[must_use]
    pub const fn pause_poll(&self) -> Duration {
        self.pause_poll
    }

    fn wake(&self) {
        let _ = self.wake_tx.try_send(());
    }

    fn sleep_until_woken(&self, timeout: Duration) {
        let _ = self.wake_rx.recv_timeout(timeout);
    }
}

/// Production gate driven by a shared [`RunSignal`].
#[derive(Debug, Clone)]
pub struct StepScheduler {
    signal: Arc<RunSignal>,
}

impl StepScheduler {
    /// Create a scheduler reading `signal`.
    #[must_use]
    pub const fn new(signal: Arc<RunSignal>) -> Self {
        Self { signal }
    }
}

impl StepGate for StepScheduler {
    fn wait_step(&self) -> StepOutcome {
        let deadline = Instant::now() + self.signal.delay();

        loop {
            if self.signal.state().is_abort() {
                return StepOutcome::Abort;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.signal.sleep_until_woken(deadline - now);
        }

        if self.signal.state() == RunState::Paused {
            trace!("step gate holding while paused");
        }
        while self.signal.state() == RunState::Paused {
            self.signal.sleep_until_woken(self.signal.pause_poll());
        }

        if self.signal.state().is_abort() {
            StepOutcome::Abort
        } else {
            StepOutcome::Proceed
        }
    }
}
