//! Coinbox: a coin-operated vending machine as an entry/update/exit
//! state machine.
//!
//! The machine tracks money inserted, checks selections against prices and
//! pays change out greedily. Everything physical (buttons, servos, screens)
//! sits outside: a driver feeds one token per step and reads the result back.
//!
//! # Core Concepts
//!
//! - **Catalog**: immutable coin and product tables in minor units
//! - **States**: `waiting`, `add_coins`, `deliver_product`, `count_change`
//! - **Engine**: owns the states, applies transitions, records history
//! - **Notifications**: human-facing text about dispensing and change
//!
//! # Example
//!
//! ```rust
//! use coinbox::{StateId, VendingMachine};
//!
//! let mut machine = VendingMachine::standard().unwrap();
//!
//! machine.handle("toonie").unwrap();
//! assert_eq!(machine.amount_inserted(), 200);
//!
//! machine.press_return().unwrap();
//! assert_eq!(machine.current_state(), Some(StateId::CountChange));
//! assert_eq!(machine.change_due(), 200);
//!
//! machine.step().unwrap();
//! assert_eq!(machine.current_state(), Some(StateId::Waiting));
//! assert_eq!(machine.change_due(), 0);
//! ```

pub mod catalog;
pub mod core;
pub mod machine;
pub mod money;
pub mod states;

// Re-export commonly used types
pub use self::catalog::{Catalog, CatalogBuilder, Coin, Product};
pub use self::core::{Notification, StateId, RETURN_TOKEN};
pub use self::machine::{MachineBuilder, MachineError, Snapshot, StepResult, VendingMachine};
