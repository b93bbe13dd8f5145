use super::{Outcome, StateBehavior, Transition};
use crate::core::{Notification, StateId};
use crate::machine::MachineContext;
use tracing::warn;

/// Pays out change, largest coin first, in a single update.
///
/// If the catalog's denominations cannot make up what is owed, the state
/// keeps the remainder and stays put. With the standard catalog every
/// reachable amount is a multiple of 5, so this never happens.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountChangeState;

impl StateBehavior for CountChangeState {
    fn id(&self) -> StateId {
        StateId::CountChange
    }

    fn on_entry(&self, ctx: &mut MachineContext, _transition: &Transition) -> Outcome {
        ctx.notify(Notification::ChangeDue {
            amount: ctx.change_due,
        });
        Ok(None)
    }

    fn update(&self, ctx: &mut MachineContext) -> Outcome {
        let values = ctx.catalog().descending_coin_values().to_vec();
        for value in values {
            while ctx.change_due >= value {
                ctx.change_due -= value;
                ctx.notify(Notification::ReturningCoin { value });
            }
        }

        if ctx.change_due == 0 {
            return Ok(Some(Transition::to(StateId::Waiting)));
        }

        warn!(
            remaining = ctx.change_due,
            "change cannot be made from catalog denominations"
        );
        Ok(None)
    }
}
