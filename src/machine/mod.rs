//! The vending machine engine.
//!
//! This module is the imperative shell around the states:
//! - [`VendingMachine`] owns the state registry and applies transitions
//! - [`MachineContext`] holds the counters and collaborators states share
//! - [`MachineBuilder`] wires catalog, states and hardware together
//! - [`Actuator`] is the only way the engine reaches hardware

pub mod actuator;
mod builder;
mod context;
mod engine;
mod error;
mod snapshot;

pub use actuator::{Actuator, ActuatorError, Servo, ServoPosition, ServoSweep};
pub use builder::{BuildError, MachineBuilder};
pub use context::{MachineContext, DEFAULT_NOTIFICATION_LIMIT};
pub use engine::{StepResult, VendingMachine, MAX_CHAINED_TRANSITIONS};
pub use error::MachineError;
pub use snapshot::Snapshot;
