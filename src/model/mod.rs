//! Pure data structures exchanged with the record store.

pub mod outcome;
pub mod query;
pub mod record;

pub use outcome::*;
pub use query::*;
pub use record::*;
