//! Quiescence-window debouncing for search input.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Default quiescence window for search input.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Keeps the latest input and releases it once no newer input arrived for `window`.
///
/// Time is passed in explicitly, so the state machine itself never sleeps.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Records an input event at `now`, replacing any input still waiting.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// When the waiting input resolves, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Releases the waiting input if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Sleeps until the waiting input resolves and returns it; `None` when idle.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        sleep_until(deadline).await;
        self.poll(deadline)
    }

    /// Drops the waiting input without resolving it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

/// Spawns a task that debounces a stream of inputs.
///
/// Only inputs followed by `window` of silence come out the other side. When the input
/// closes, a still-waiting value is flushed immediately.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    window: Duration,
) -> mpsc::Receiver<T> {
    let (output, resolved) = mpsc::channel(8);

    tokio::spawn(async move {
        let mut debouncer = Debouncer::new(window);
        loop {
            let wake = debouncer.deadline();
            tokio::select! {
                received = input.recv() => match received {
                    Some(value) => debouncer.push(value, Instant::now()),
                    None => {
                        if let Some(value) = debouncer.cancel() {
                            let _ = output.send(value).await;
                        }
                        break;
                    }
                },
                _ = sleep_until(wake.unwrap_or_else(Instant::now)), if wake.is_some() => {
                    if let Some(value) = debouncer.poll(Instant::now()) {
                        if output.send(value).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
        debug!("Debounce input closed");
    });

    resolved
}
