//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`; callers own locking.

mod marker_record;

pub use marker_record::*;
