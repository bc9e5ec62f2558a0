//! Cancellation and pause token shared between a controller and its executors
//!
//! The controller owns the only writer ([`ControlHandle`]); executors hold
//! readers ([`RunSignal`]). State lives in a `tokio::sync::watch` channel, so
//! a paused executor parks on the channel and is woken by `resume` or
//! `cancel` instead of polling.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Lifecycle of a run as seen by its executors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    /// Terminal: a cancelled run is never resumed
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Control {
    state: RunState,
    speed: Duration,
}

/// Raised by the signal when a run must unwind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Writer side of the token. Cloning shares the same channel, so every
/// executor subscribed to it sees the same pause and cancel state.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: Arc<watch::Sender<Control>>,
}

impl ControlHandle {
    pub fn new(speed: Duration) -> Self {
        let (tx, _rx) = watch::channel(Control {
            state: RunState::Running,
            speed,
        });
        ControlHandle { tx: Arc::new(tx) }
    }

    /// New reader for an executor
    pub fn signal(&self) -> RunSignal {
        RunSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn pause(&self) {
        self.tx.send_if_modified(|c| {
            if c.state == RunState::Running {
                c.state = RunState::Paused;
                true
            } else {
                false
            }
        });
    }

    pub fn resume(&self) {
        self.tx.send_if_modified(|c| {
            if c.state == RunState::Paused {
                c.state = RunState::Running;
                true
            } else {
                false
            }
        });
    }

    pub fn cancel(&self) {
        self.tx.send_if_modified(|c| {
            if c.state == RunState::Cancelled {
                false
            } else {
                c.state = RunState::Cancelled;
                true
            }
        });
    }

    /// Takes effect at the executor's next end-of-unit delay
    pub fn set_speed(&self, speed: Duration) {
        self.tx.send_if_modified(|c| {
            if c.speed == speed {
                false
            } else {
                c.speed = speed;
                true
            }
        });
    }

    pub fn state(&self) -> RunState {
        self.tx.borrow().state
    }

    pub fn speed(&self) -> Duration {
        self.tx.borrow().speed
    }
}

/// Reader side of the token, held by one executor
#[derive(Debug, Clone)]
pub struct RunSignal {
    rx: watch::Receiver<Control>,
}

impl RunSignal {
    pub fn is_cancelled(&self) -> bool {
        self.rx.borrow().state == RunState::Cancelled
    }

    pub fn is_paused(&self) -> bool {
        self.rx.borrow().state == RunState::Paused
    }

    pub fn speed(&self) -> Duration {
        self.rx.borrow().speed
    }

    /// Suspend until the run is no longer paused.
    ///
    /// Returns `Err(Cancelled)` if the run was cancelled, including while
    /// parked. A controller dropped while the run is paused can never resume
    /// it, so that also counts as cancellation.
    pub async fn wait_while_paused(&mut self) -> Result<(), Cancelled> {
        let woken = self
            .rx
            .wait_for(|c| c.state != RunState::Paused)
            .await
            .map(|control| control.state);
        let state = match woken {
            Ok(state) => state,
            Err(_) => match self.rx.borrow().state {
                RunState::Paused => RunState::Cancelled,
                other => other,
            },
        };
        if state == RunState::Cancelled {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for the current speed, waking early on cancel.
    ///
    /// A zero speed still yields once so sibling tasks on the same thread get
    /// a turn.
    pub async fn throttle(&mut self) {
        let speed = self.speed();
        if speed.is_zero() {
            tokio::task::yield_now().await;
            return;
        }
        let mut rx = self.rx.clone();
        tokio::select! {
            _ = tokio::time::sleep(speed) => {}
            _ = cancelled(&mut rx) => {}
        }
    }
}

/// Resolves once the run is cancelled; pends forever if the writer is gone
async fn cancelled(rx: &mut watch::Receiver<Control>) {
    if rx
        .wait_for(|c| c.state == RunState::Cancelled)
        .await
        .is_err()
    {
        std::future::pending::<()>().await;
    }
}
