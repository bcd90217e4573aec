//! savings-core
//!
//! Business logic for the savings goal ledger.
//! Depends on savings-domain. No CLI, no terminal I/O, no direct file access.

pub mod amount;
pub mod contribution_service;
pub mod error;
pub mod goal_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod view_state;

pub use amount::*;
pub use contribution_service::*;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use goal_service::*;
pub use storage::{KeyValueStore, MemoryStore, GOALS_STORAGE_KEY};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use view_state::ViewState;

#[cfg(test)]
mod tests;
