//! Core vending machine types.
//!
//! This module contains the plain data the engine and states share:
//! - State identifiers
//! - Event classification and the return token
//! - Customer-facing notifications
//! - Bounded transition history

mod event;
mod history;
mod notification;
mod state;

pub use event::{Event, RETURN_TOKEN};
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use notification::Notification;
pub use state::StateId;
