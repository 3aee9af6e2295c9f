//! Wall-clock driver for a [`BreathingSession`].
//!
//! Owns the once-per-second cadence on a Tokio task and publishes every
//! transition plus a snapshot per tick on an unbounded channel. At most one
//! tick task exists per driver: `start` aborts the previous one, and the
//! task is aborted on `stop`, on completion and when the driver is dropped.
//!
//! ## Usage
//!
//! ```ignore
//! let (mut driver, mut events) = BreathingDriver::new(session);
//! driver.start(5);
//! while let Some(event) = events.recv().await {
//!     render(&event);
//!     if event.is_terminal() { break; }
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::session::BreathingSession;
use crate::events::Event;

const TICK: Duration = Duration::from_secs(1);

pub struct BreathingDriver {
    session: Arc<Mutex<BreathingSession>>,
    events: mpsc::UnboundedSender<Event>,
    task: Option<JoinHandle<()>>,
    period: Duration,
}

fn lock(session: &Mutex<BreathingSession>) -> MutexGuard<'_, BreathingSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl BreathingDriver {
    pub fn new(session: BreathingSession) -> (Self, mpsc::UnboundedReceiver<Event>) {
        Self::with_period(session, TICK)
    }

    /// Driver with a custom tick period.
    pub fn with_period(
        session: BreathingSession,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                session: Arc::new(Mutex::new(session)),
                events: tx,
                task: None,
                period,
            },
            rx,
        )
    }

    /// Copy of the current session state.
    pub fn session(&self) -> BreathingSession {
        lock(&self.session).clone()
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.session).snapshot()
    }

    /// Whether a tick task is alive.
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start the session and its tick task. Must be called from within a
    /// Tokio runtime.
    ///
    /// Returns `false` (and schedules nothing) when the session refuses to
    /// start.
    pub fn start(&mut self, target_cycles: u32) -> bool {
        self.cancel();

        let started = lock(&self.session).start(target_cycles);
        let Some(event) = started else {
            return false;
        };
        let _ = self.events.send(event);

        let session = Arc::clone(&self.session);
        let tx = self.events.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let (event, snapshot, running) = {
                    let mut s = lock(&session);
                    let event = s.tick();
                    (event, s.snapshot(), s.is_running())
                };
                if let Some(event) = event {
                    let _ = tx.send(event);
                }
                let _ = tx.send(snapshot);
                if !running {
                    break;
                }
            }
        }));
        true
    }

    /// Stop ticking. No-op (returns `None`) when nothing is running.
    pub fn stop(&mut self) -> Option<Event> {
        self.cancel();
        let event = lock(&self.session).stop()?;
        let _ = self.events.send(event.clone());
        Some(event)
    }

    /// Wait for the current tick task to finish on its own.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.as_mut() {
            let _ = task.await;
        }
        self.task = None;
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("tick task cancelled");
        }
    }
}

impl Drop for BreathingDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}
