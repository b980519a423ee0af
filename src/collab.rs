//! # Presentation Collaborators
//!
//! Capabilities the controllers call out to but do not implement: a busy indicator and a
//! confirmation dialog. The console binary provides simple implementations; tests script
//! them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shows that a store call is in progress.
pub trait BusyIndicator: Send + Sync {
    fn set_busy(&self, busy: bool);
}

/// Keeps an indicator busy until dropped.
pub struct BusyGuard {
    indicator: Arc<dyn BusyIndicator>,
}

impl BusyGuard {
    pub fn engage(indicator: Arc<dyn BusyIndicator>) -> Self {
        indicator.set_busy(true);
        Self { indicator }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.indicator.set_busy(false);
    }
}

/// Whether the user went ahead with a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

/// Asks the user to confirm deleting the record called `name`.
#[async_trait]
pub trait ConfirmationDialog: Send + Sync {
    async fn request_confirmation(&self, name: &str) -> Confirmation;
}

/// Busy indicator that only counts transitions. Used by the console and in tests.
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: AtomicBool,
    activations: AtomicUsize,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// How many times the indicator was switched on.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl BusyIndicator for BusyFlag {
    fn set_busy(&self, busy: bool) {
        debug!(busy, "Busy indicator");
        if busy {
            self.activations.fetch_add(1, Ordering::SeqCst);
        }
        self.busy.store(busy, Ordering::SeqCst);
    }
}

/// Dialog that always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub Confirmation);

#[async_trait]
impl ConfirmationDialog for FixedAnswer {
    async fn request_confirmation(&self, name: &str) -> Confirmation {
        debug!(name, answer = ?self.0, "Confirmation requested");
        self.0
    }
}
