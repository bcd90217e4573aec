//! savings-domain
//!
//! Pure domain models (Goal, Contribution, GoalColor, GoalLedger).
//! No I/O, no CLI, no storage. Only data types and their local helpers.

pub mod color;
pub mod common;
pub mod contribution;
pub mod goal;
pub mod ledger;

pub use color::*;
pub use common::*;
pub use contribution::*;
pub use goal::*;
pub use ledger::*;
