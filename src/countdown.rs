//! Capture delay countdown
//!
//! [`Countdown`] is the bare state machine; [`start`] drives it from a
//! repeating timer on the async runtime and returns a handle that stops the
//! timer when dropped.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Result of one elapsed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: u32,
    /// Set only on the tick that reached zero
    pub completed: bool,
}

/// Seconds left before the delayed action is due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    finished: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            finished: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Count one second down. Returns None once the countdown has completed.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.finished {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.finished = self.remaining == 0;
        Some(Tick {
            remaining: self.remaining,
            completed: self.finished,
        })
    }
}

/// Delivered to the countdown callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; the value is what is left
    Tick(u32),
    /// Reached zero; sent exactly once
    Finished,
}

/// Owns a running countdown timer
#[derive(Debug)]
pub struct CountdownHandle {
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    /// Stop ticking; no further events are delivered
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Wait for the countdown. Returns false if it was stopped first.
    pub async fn wait(mut self) -> bool {
        match self.task.take() {
            Some(task) => task.await.is_ok(),
            None => false,
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start counting down from `seconds`, one tick per `period`
///
/// Must be called from within a tokio runtime. The callback runs on that
/// runtime for every tick and once more with [`CountdownEvent::Finished`].
pub fn start<F>(seconds: u32, period: Duration, mut on_event: F) -> CountdownHandle
where
    F: FnMut(CountdownEvent) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut countdown = Countdown::new(seconds);
        // interval() would fire immediately; the first tick is one period out
        let mut interval = interval_at(Instant::now() + period, period);
        while !countdown.is_finished() {
            interval.tick().await;
            let Some(tick) = countdown.tick() else {
                break;
            };
            log::debug!("Countdown tick, {} left", countdown.remaining());
            on_event(CountdownEvent::Tick(tick.remaining));
            if tick.completed {
                on_event(CountdownEvent::Finished);
            }
        }
    });

    CountdownHandle { task: Some(task) }
}
