//! `refdata-events` — lifecycle events and their distribution.
//!
//! Events here are write-only audit artifacts: aggregates record what
//! changed, the commit drains the buffer, and subscribers (logging, audit)
//! consume the facts. Nothing rebuilds state from events.

pub mod bus;
pub mod event;
pub mod log;

pub use bus::{EventBus, InMemoryEventBus, PublishError, Subscription};
pub use event::{LifecycleEvent, LifecycleKind};
pub use log::{EventLog, HasEvents};
