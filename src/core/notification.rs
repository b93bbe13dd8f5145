//! Human-facing notifications emitted while a machine runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Something the display or log sink should tell the customer.
///
/// The `Display` form is the text a status panel shows; it is not meant
/// to be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A product is being dispensed
    Dispensing { label: String },
    /// The machine owes the customer this much change
    ChangeDue { amount: u32 },
    /// One coin of this value is being returned
    ReturningCoin { value: u32 },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispensing { label } => write!(f, "Dispensing: {label}"),
            Self::ChangeDue { amount } => write!(f, "Change due: {amount} cents"),
            Self::ReturningCoin { value } => write!(f, "Returning {value}¢"),
        }
    }
}
