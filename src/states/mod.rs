//! The four vending machine states.
//!
//! Each state is a unit type implementing [`StateBehavior`]. A state never
//! calls back into the engine; it returns the transition it wants and the
//! engine applies it. Entry hooks may request one follow-up transition,
//! which is how the deliver state passes straight through.

mod add_coins;
mod count_change;
mod deliver_product;
mod waiting;

pub use add_coins::AddCoinsState;
pub use count_change::CountChangeState;
pub use deliver_product::DeliverProductState;
pub use waiting::WaitingState;

use crate::catalog::Product;
use crate::core::StateId;
use crate::machine::{MachineContext, MachineError};

/// What a hook returns: an optional transition to apply next.
pub type Outcome = Result<Option<Transition>, MachineError>;

/// A requested move to another state.
///
/// The selected product rides along as transition data so the deliver
/// state never has to re-read the pending event.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub target: StateId,
    pub selection: Option<Product>,
}

impl Transition {
    /// Plain transition with no data.
    pub fn to(target: StateId) -> Self {
        Self {
            target,
            selection: None,
        }
    }

    /// Transition into the deliver state for `product`.
    pub fn deliver(product: Product) -> Self {
        Self {
            target: StateId::DeliverProduct,
            selection: Some(product),
        }
    }
}

/// Entry/update/exit behavior of one state.
///
/// Every hook has a no-op default; states override only what they need.
pub trait StateBehavior: Send {
    /// Identifier this behavior is registered under.
    fn id(&self) -> StateId;

    /// Reject a transition before the current state is exited.
    fn check_entry(&self, _transition: &Transition) -> Result<(), MachineError> {
        Ok(())
    }

    fn on_entry(&self, _ctx: &mut MachineContext, _transition: &Transition) -> Outcome {
        Ok(None)
    }

    fn on_exit(&self, _ctx: &mut MachineContext) {}

    fn update(&self, _ctx: &mut MachineContext) -> Outcome {
        Ok(None)
    }
}

/// One boxed instance of each of the four states.
pub fn standard_states() -> Vec<Box<dyn StateBehavior>> {
    vec![
        Box::new(WaitingState),
        Box::new(AddCoinsState),
        Box::new(DeliverProductState),
        Box::new(CountChangeState),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_states_cover_every_id() {
        let ids: Vec<StateId> = standard_states().iter().map(|s| s.id()).collect();
        assert_eq!(ids, StateId::ALL.to_vec());
    }

    #[test]
    fn plain_transition_has_no_selection() {
        let transition = Transition::to(StateId::Waiting);
        assert_eq!(transition.target, StateId::Waiting);
        assert!(transition.selection.is_none());
    }
}
