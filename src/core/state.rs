//! State identifiers for the vending machine.
//!
//! Every behavior registered with the engine is keyed by one of these
//! identifiers. The identifier is also what the driver reads back after
//! each step to know where the machine is.

use crate::machine::MachineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four states a vending machine can be in.
///
/// # Example
///
/// ```rust
/// use coinbox::core::StateId;
///
/// let state: StateId = "add_coins".parse().unwrap();
/// assert_eq!(state, StateId::AddCoins);
/// assert_eq!(state.name(), "add_coins");
/// assert!(!state.is_resting());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateId {
    Waiting,
    AddCoins,
    DeliverProduct,
    CountChange,
}

impl StateId {
    /// All identifiers, in session order.
    pub const ALL: [StateId; 4] = [
        StateId::Waiting,
        StateId::AddCoins,
        StateId::DeliverProduct,
        StateId::CountChange,
    ];

    /// Get the state's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::AddCoins => "add_coins",
            Self::DeliverProduct => "deliver_product",
            Self::CountChange => "count_change",
        }
    }

    /// Check if this is the state a machine rests in between sessions.
    ///
    /// Only `Waiting` holds no customer money.
    pub fn is_resting(&self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateId {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| MachineError::UnknownState {
                name: s.to_string(),
            })
    }
}
