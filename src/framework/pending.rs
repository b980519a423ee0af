//! In-flight store calls tagged with a generation ticket.
//!
//! A view that can have several fetches in flight (page change racing a filter change,
//! a slow refresh racing a newer one) issues a ticket per fetch and only applies the
//! completion holding the latest ticket. Older completions are discarded.

use super::error::StoreError;
use std::future::Future;
use tokio::task::JoinHandle;

/// Monotonic ticket issuer for one view.
#[derive(Debug, Default)]
pub struct Tickets {
    latest: u64,
}

impl Tickets {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

/// A spawned store call and the ticket it was issued under.
#[must_use = "a pending fetch does nothing to the view until it is settled"]
pub struct Pending<T> {
    ticket: u64,
    handle: JoinHandle<Result<T, StoreError>>,
}

impl<T: Send + 'static> Pending<T> {
    pub fn spawn<F>(ticket: u64, call: F) -> Self
    where
        F: Future<Output = Result<T, StoreError>> + Send + 'static,
    {
        Self {
            ticket,
            handle: tokio::spawn(call),
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Waits for the call to finish.
    pub async fn wait(self) -> Result<T, StoreError> {
        self.handle.await.map_err(|_| StoreError::Dropped)?
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending").field("ticket", &self.ticket).finish()
    }
}
