#![doc(test(attr(deny(warnings))))]

//! Vending Core simulates a retail vending machine: a priced product
//! catalog, a cash ledger with exact denomination-based change, purchase
//! validation, and the transaction/sales reporting around them.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod machine;
pub mod reporting;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Vending Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
