use super::{Outcome, StateBehavior, Transition};
use crate::core::{Event, StateId};
use crate::machine::MachineContext;
use tracing::debug;

/// Idle between sessions. Only a coin wakes the machine up.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitingState;

impl StateBehavior for WaitingState {
    fn id(&self) -> StateId {
        StateId::Waiting
    }

    fn on_entry(&self, ctx: &mut MachineContext, _transition: &Transition) -> Outcome {
        ctx.amount_inserted = 0;
        ctx.change_due = 0;
        ctx.end_session();
        Ok(None)
    }

    fn update(&self, ctx: &mut MachineContext) -> Outcome {
        let token = match ctx.event() {
            Event::Coin(coin) => coin.token.clone(),
            _ => {
                debug!(event = ctx.pending_event(), "ignored while waiting");
                return Ok(None);
            }
        };

        let session = ctx.start_session();
        let amount = ctx.deposit_coin(&token)?;
        debug!(%session, coin = %token, amount, "session started");
        Ok(Some(Transition::to(StateId::AddCoins)))
    }
}
