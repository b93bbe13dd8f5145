//! Errors raised by the engine.

use crate::core::StateId;
use thiserror::Error;

/// Errors that can occur while driving a vending machine.
///
/// None of these occur for ordinary customer input: unknown tokens,
/// insufficient funds and idle sessions are no-ops. They signal misuse of
/// the engine or a broken setup.
#[derive(Debug, Error, PartialEq)]
pub enum MachineError {
    #[error("No state registered under '{name}'")]
    UnknownState { name: String },

    #[error("Coin '{token}' is not in the catalog")]
    UnknownCoin { token: String },

    #[error("Cannot enter '{state}' without a selected product")]
    MissingSelection { state: StateId },

    #[error("Inserted {inserted} does not cover price {price}")]
    InsufficientFunds { price: u32, inserted: u32 },

    #[error("Depositing {value} would overflow the inserted amount")]
    AmountOverflow { value: u32 },

    #[error("More than {limit} chained transitions in a single call")]
    TransitionLimit { limit: usize },
}
