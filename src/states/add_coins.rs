use super::{Outcome, StateBehavior, Transition};
use crate::core::{Event, StateId};
use crate::machine::MachineContext;
use tracing::debug;

/// Collecting money. Accepts more coins, a product selection, or the
/// return signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddCoinsState;

impl StateBehavior for AddCoinsState {
    fn id(&self) -> StateId {
        StateId::AddCoins
    }

    fn update(&self, ctx: &mut MachineContext) -> Outcome {
        match ctx.event() {
            Event::Return => {
                ctx.change_due = ctx.amount_inserted;
                ctx.amount_inserted = 0;
                Ok(Some(Transition::to(StateId::CountChange)))
            }
            Event::Coin(coin) => {
                let token = coin.token.clone();
                let amount = ctx.deposit_coin(&token)?;
                debug!(coin = %token, amount, "coin added");
                Ok(None)
            }
            Event::Product(product) if ctx.amount_inserted >= product.price => {
                Ok(Some(Transition::deliver(product.clone())))
            }
            Event::Product(product) => {
                debug!(
                    product = %product.token,
                    price = product.price,
                    inserted = ctx.amount_inserted,
                    "insufficient funds"
                );
                Ok(None)
            }
            Event::Unrecognized => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::core::RETURN_TOKEN;

    fn context_with(amount: u32) -> MachineContext {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.amount_inserted = amount;
        ctx
    }

    #[test]
    fn return_moves_amount_into_change() {
        let mut ctx = context_with(200);
        ctx.set_pending_event(RETURN_TOKEN);

        let next = AddCoinsState.update(&mut ctx).unwrap();

        assert_eq!(next, Some(Transition::to(StateId::CountChange)));
        assert_eq!(ctx.amount_inserted, 0);
        assert_eq!(ctx.change_due, 200);
    }

    #[test]
    fn coin_adds_and_stays() {
        let mut ctx = context_with(20);
        ctx.set_pending_event("25");

        let next = AddCoinsState.update(&mut ctx).unwrap();

        assert!(next.is_none());
        assert_eq!(ctx.amount_inserted, 45);
    }

    #[test]
    fn affordable_product_selects_delivery() {
        let mut ctx = context_with(45);
        ctx.set_pending_event("gum");

        let next = AddCoinsState.update(&mut ctx).unwrap().unwrap();

        assert_eq!(next.target, StateId::DeliverProduct);
        assert_eq!(next.selection.map(|p| p.token), Some("gum".to_string()));
        // Delivery settles the counters, selection doesn't.
        assert_eq!(ctx.amount_inserted, 45);
        assert_eq!(ctx.change_due, 0);
    }

    #[test]
    fn exact_amount_is_enough() {
        let mut ctx = context_with(150);
        ctx.set_pending_event("chips");

        let next = AddCoinsState.update(&mut ctx).unwrap();
        assert!(matches!(next, Some(t) if t.target == StateId::DeliverProduct));
    }

    #[test]
    fn insufficient_funds_keeps_money() {
        let mut ctx = context_with(20);
        ctx.set_pending_event("gum");

        let next = AddCoinsState.update(&mut ctx).unwrap();

        assert!(next.is_none());
        assert_eq!(ctx.amount_inserted, 20);
    }

    #[test]
    fn unknown_event_is_noop() {
        let mut ctx = context_with(35);
        ctx.set_pending_event("__TIMEOUT__");

        let next = AddCoinsState.update(&mut ctx).unwrap();

        assert!(next.is_none());
        assert_eq!(ctx.amount_inserted, 35);
        assert_eq!(ctx.change_due, 0);
    }
}
