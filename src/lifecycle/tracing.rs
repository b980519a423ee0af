//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//!
//! ```bash
//! # Store lifecycle, mutations and refreshes
//! RUST_LOG=info cargo run
//!
//! # Every store request with its payload
//! RUST_LOG=debug cargo run
//!
//! # Only the store plumbing
//! RUST_LOG=inventory_console::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a delete from the dashboard reads:
//!
//! ```text
//! INFO Store started backend="memory" size=3
//! INFO Item deleted id=000000000000000000000002
//! INFO Stats refreshed total_items=7 total_value=80.5
//! ```
//!
//! Payloads are logged once at `debug` where a request enters a backend; the lines
//! after that carry ids and counts only.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
