#![doc(test(attr(deny(warnings))))]

//! Savings Tracker hosts the goal ledger: it loads the stored goals, applies
//! mutations through `savings-core`, writes every change back to the store and
//! drives the `savings_cli` terminal shell.

pub mod cli;
pub mod errors;
pub mod ledger;
pub mod utils;

pub use errors::AppError;
pub use ledger::GoalManager;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Savings Tracker tracing initialized.");
    });
}
