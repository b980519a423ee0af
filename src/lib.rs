//! # Inventory Console
//!
//! The controller layer of an inventory management console. It keeps a paginated,
//! searchable view of inventory records consistent with a remote record store while the
//! user searches, filters, pages, edits, adjusts quantities, deletes, imports and exports.
//!
//! ## Architecture
//!
//! Controllers never talk to a backend directly. They hold a [`StoreClient`](framework::StoreClient),
//! which sends typed requests over a channel to whichever backend actor owns the other end:
//! an in-process [`MemoryStore`](framework::MemoryStore), the REST-backed
//! [`HttpStore`](framework::HttpStore), or a scripted [`MockStore`](framework::mock::MockStore)
//! in tests.
//!
//! Every read that can race is tagged with a ticket, and only the latest issued ticket may
//! overwrite view state. A slow response for an old query never replaces a newer one.
//!
//! ## Module Tour
//!
//! ### 1. Data ([`model`])
//! Records, drafts, query state and batch outcomes.
//!
//! ### 2. Store plumbing ([`framework`])
//! The request contract, its client, backends and the test double.
//!
//! ### 3. Controllers
//! - [`form`]: schema-driven create/edit form with validation
//! - [`query`]: search/filter/paging composition and the search debouncer
//! - [`stats`]: aggregate metrics over the full record set
//! - [`dashboard`]: the view controller tying the pieces together
//! - [`import`] / [`export`]: bulk import and paginated report rendering
//!
//! ### 4. Wiring ([`config`], [`lifecycle`])
//! Environment configuration, tracing setup and backend startup/shutdown.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod collab;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod form;
pub mod framework;
pub mod import;
pub mod lifecycle;
pub mod model;
pub mod query;
pub mod stats;
