use super::{Outcome, StateBehavior, Transition};
use crate::core::{Notification, StateId};
use crate::machine::{MachineContext, MachineError};

/// Pass-through state: settles the sale on entry and leaves immediately.
///
/// Has no update behavior, so a machine is never observed resting here
/// between driver steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeliverProductState;

impl StateBehavior for DeliverProductState {
    fn id(&self) -> StateId {
        StateId::DeliverProduct
    }

    fn check_entry(&self, transition: &Transition) -> Result<(), MachineError> {
        match transition.selection {
            Some(_) => Ok(()),
            None => Err(MachineError::MissingSelection { state: self.id() }),
        }
    }

    fn on_entry(&self, ctx: &mut MachineContext, transition: &Transition) -> Outcome {
        let product = transition
            .selection
            .as_ref()
            .ok_or(MachineError::MissingSelection { state: self.id() })?;

        ctx.change_due = ctx.amount_inserted.checked_sub(product.price).ok_or(
            MachineError::InsufficientFunds {
                price: product.price,
                inserted: ctx.amount_inserted,
            },
        )?;
        ctx.amount_inserted = 0;

        ctx.notify(Notification::Dispensing {
            label: product.label.clone(),
        });
        ctx.actuate(product);

        let next = if ctx.change_due > 0 {
            StateId::CountChange
        } else {
            StateId::Waiting
        };
        Ok(Some(Transition::to(next)))
    }
}
