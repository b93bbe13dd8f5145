//! Classification of external event tokens.
//!
//! The driver hands the machine raw string tokens. States never match on
//! the raw string; they ask the catalog to classify it first.

use crate::catalog::{Coin, Product};

/// Token the driver sends when the customer presses the return button.
pub const RETURN_TOKEN: &str = "RETURN";

/// A token resolved against a catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event<'a> {
    /// The return signal.
    Return,
    /// A coin known to the catalog.
    Coin(&'a Coin),
    /// A product known to the catalog.
    Product(&'a Product),
    /// Anything else. Every state ignores it.
    Unrecognized,
}

impl Event<'_> {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}
