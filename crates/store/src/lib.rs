//! `refdata-store` — repository port and in-memory storage.
//!
//! The repository is the only thing that touches storage; aggregates never
//! persist themselves. `save()` is the commit point: staged writes become
//! visible atomically, pending events are drained, and the natural-key
//! uniqueness guard runs there authoritatively.

pub mod integrity;
pub mod memory;
pub mod repository;

pub use memory::MemoryRepository;
pub use repository::{MasterRecord, Repository};
