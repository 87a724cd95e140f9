//! Change tracking for documentation files.
//!
//! ## Modules
//!
//! - [`record`] - Change record model
//! - [`store`] - Key/value persistence and the record list
//! - [`tracker`] - Track, apply, revert, and query changes

pub mod record;
pub mod store;
pub mod tracker;

pub use record::{ChangeId, ChangeMetadata, ChangeOrigin, ChangeRecord, ChangeStatus, ChangeType};
pub use store::{ChangeRecordStore, FileStateStore, MemoryStateStore, StateStore};
pub use tracker::{relative_time, ActivityEntry, ChangeOutcome, ChangeStats, ChangeTracker, ManualAction};
