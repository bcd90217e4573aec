//! Host-side ownership of the goal ledger.

pub mod manager;

pub use manager::{GoalManager, LoadReport};
