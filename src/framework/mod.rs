//! Record store plumbing.
//!
//! Controllers talk to the store through a [`StoreClient`], which sends typed
//! [`StoreRequest`]s over a channel. Whoever owns the receiving end answers them:
//!
//! - [`MemoryStore`] - in-process backend
//! - [`HttpStore`] - the inventory REST API
//! - [`mock::MockStore`] - scripted answers for tests
//!
//! Every failure comes back as a [`StoreError`].

pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod message;
pub mod mock;
pub mod pending;

pub use client::StoreClient;
pub use error::StoreError;
pub use http::HttpStore;
pub use memory::{MemoryStore, MAX_PAGE_LIMIT};
pub use message::{Response, StoreRequest};
pub use pending::{Pending, Tickets};
