//! Observable state read by the driver after each step.

use crate::core::StateId;
use crate::money::format_dollars;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time view of a machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: Option<StateId>,
    pub amount_inserted: u32,
    pub change_due: u32,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.map_or("stopped", |s| s.name());
        write!(
            f,
            "[{state}] Amount Inserted: {} | Change Due: {}",
            format_dollars(self.amount_inserted),
            format_dollars(self.change_due)
        )
    }
}
