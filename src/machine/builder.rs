//! Builder for constructing vending machines.

use crate::catalog::Catalog;
use crate::core::{StateHistory, StateId, DEFAULT_HISTORY_LIMIT};
use crate::machine::actuator::Actuator;
use crate::machine::context::DEFAULT_NOTIFICATION_LIMIT;
use crate::machine::engine::VendingMachine;
use crate::machine::error::MachineError;
use crate::states::{standard_states, StateBehavior};
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("No states registered. Call .standard_states() or .state(..) before .build()")]
    NoStates,

    #[error("State '{0}' is not registered")]
    MissingState(StateId),

    #[error(transparent)]
    Machine(#[from] MachineError),
}

/// Builder for constructing vending machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use coinbox::{StateId, VendingMachine};
///
/// let machine = VendingMachine::builder()
///     .standard_states()
///     .history_limit(16)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), Some(StateId::Waiting));
/// assert_eq!(machine.history().limit(), 16);
/// ```
pub struct MachineBuilder {
    catalog: Option<Catalog>,
    states: Vec<Box<dyn StateBehavior>>,
    actuator: Option<Box<dyn Actuator>>,
    history_limit: usize,
    notification_limit: usize,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self {
            catalog: None,
            states: Vec::new(),
            actuator: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
        }
    }

    /// Set the catalog. Defaults to [`Catalog::standard`].
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Register one state behavior. Later registrations for the same id win.
    pub fn state(mut self, state: impl StateBehavior + 'static) -> Self {
        self.states.push(Box::new(state));
        self
    }

    /// Register the four standard states.
    pub fn standard_states(mut self) -> Self {
        self.states.extend(standard_states());
        self
    }

    /// Attach dispensing hardware.
    pub fn actuator(mut self, actuator: impl Actuator + 'static) -> Self {
        self.actuator = Some(Box::new(actuator));
        self
    }

    /// Number of transitions kept in history; zero disables it.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Number of undrained notifications kept; zero only logs them.
    pub fn notification_limit(mut self, limit: usize) -> Self {
        self.notification_limit = limit;
        self
    }

    /// Build the machine and enter `waiting`.
    /// Returns an error if any of the four states is missing.
    pub fn build(self) -> Result<VendingMachine, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = VendingMachine::new(self.catalog.unwrap_or_default());
        for state in self.states {
            machine.register_state(state);
        }
        if let Some(missing) = StateId::ALL.into_iter().find(|id| !machine.is_registered(*id)) {
            return Err(BuildError::MissingState(missing));
        }

        machine.set_history(StateHistory::with_limit(self.history_limit));
        machine.set_notification_limit(self.notification_limit);
        if let Some(actuator) = self.actuator {
            machine.set_actuator(actuator);
        }

        machine.transition_to(StateId::Waiting)?;
        Ok(machine)
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
