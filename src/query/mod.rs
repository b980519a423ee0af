//! Query composition for the paginated view: search (debounced), filters, sort and paging.

pub mod composer;
pub mod debounce;

pub use composer::QueryComposer;
pub use debounce::{debounce, Debouncer, SEARCH_DEBOUNCE};
