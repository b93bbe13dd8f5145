//! The engine that owns the states and drives transitions.

use crate::catalog::Catalog;
use crate::core::{Notification, StateHistory, StateId, StateTransition, RETURN_TOKEN};
use crate::machine::actuator::Actuator;
use crate::machine::builder::MachineBuilder;
use crate::machine::context::MachineContext;
use crate::machine::error::MachineError;
use crate::machine::snapshot::Snapshot;
use crate::states::{StateBehavior, Transition};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Upper bound on transitions applied by one `transition_to` or `step`.
///
/// The longest legitimate chain is add_coins → deliver_product →
/// count_change, so hitting this means a state keeps bouncing.
pub const MAX_CHAINED_TRANSITIONS: usize = 8;

/// Result of executing a single step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// No state entered yet; nothing ran
    NotStarted,

    /// Update ran without requesting a transition
    Stayed(StateId),

    /// Update requested a transition; `to` is where the chain ended
    Transitioned { from: StateId, to: StateId },
}

/// A vending machine: registered states, the current one, and the
/// context they share.
///
/// # Example
///
/// ```rust
/// use coinbox::{StateId, VendingMachine};
///
/// let mut machine = VendingMachine::standard().unwrap();
/// for token in ["10", "10", "25", "gum"] {
///     machine.handle(token).unwrap();
/// }
/// assert_eq!(machine.current_state(), Some(StateId::CountChange));
/// assert_eq!(machine.change_due(), 20);
///
/// machine.step().unwrap();
/// assert_eq!(machine.current_state(), Some(StateId::Waiting));
/// assert_eq!(machine.change_due(), 0);
/// ```
pub struct VendingMachine {
    states: HashMap<StateId, Box<dyn StateBehavior>>,
    current: Option<StateId>,
    context: MachineContext,
    history: StateHistory,
}

impl VendingMachine {
    /// Create an empty machine. Register states, then `transition_to`
    /// the initial one.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            context: MachineContext::new(catalog),
            history: StateHistory::default(),
        }
    }

    pub fn builder() -> MachineBuilder {
        MachineBuilder::new()
    }

    /// Standard catalog, the four standard states, resting in `waiting`.
    pub fn standard() -> Result<Self, MachineError> {
        let mut machine = Self::new(Catalog::standard());
        for state in crate::states::standard_states() {
            machine.register_state(state);
        }
        machine.transition_to(StateId::Waiting)?;
        Ok(machine)
    }

    /// Add a state behavior. A later registration for the same id wins.
    pub fn register_state(&mut self, state: Box<dyn StateBehavior>) {
        self.states.insert(state.id(), state);
    }

    pub fn is_registered(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    pub(crate) fn set_history(&mut self, history: StateHistory) {
        self.history = history;
    }

    pub(crate) fn set_actuator(&mut self, actuator: Box<dyn Actuator>) {
        self.context.set_actuator(actuator);
    }

    pub(crate) fn set_notification_limit(&mut self, limit: usize) {
        self.context.set_notification_limit(limit);
    }

    /// Move to `target`: exit the current state, enter the target, and
    /// follow any transition the entry hook requests.
    ///
    /// On error the machine is left as it was before the call.
    pub fn transition_to(&mut self, target: StateId) -> Result<(), MachineError> {
        self.atomically(|machine| machine.apply(Transition::to(target)))
    }

    /// Run the current state's update against the pending event.
    ///
    /// On error the current state, counters, session, notifications and
    /// history are rolled back. Hardware the actuator already drove and
    /// exit hooks that already ran are not undone.
    pub fn step(&mut self) -> Result<StepResult, MachineError> {
        let Some(current) = self.current else {
            return Ok(StepResult::NotStarted);
        };

        self.atomically(|machine| {
            let state = lookup(&machine.states, current)?;
            match state.update(&mut machine.context)? {
                Some(transition) => {
                    machine.apply(transition)?;
                    Ok(StepResult::Transitioned {
                        from: current,
                        to: machine.current.unwrap_or(current),
                    })
                }
                None => Ok(StepResult::Stayed(current)),
            }
        })
    }

    /// Set the pending event. It stays until replaced.
    pub fn set_event(&mut self, token: impl Into<String>) {
        self.context.set_pending_event(token);
        debug!(
            token = self.context.pending_event(),
            recognized = self.context.event().is_recognized(),
            "event"
        );
    }

    /// Set the pending event and step once.
    pub fn handle(&mut self, token: impl Into<String>) -> Result<StepResult, MachineError> {
        self.set_event(token);
        self.step()
    }

    /// Entry point for a physical return button.
    pub fn press_return(&mut self) -> Result<StepResult, MachineError> {
        self.handle(RETURN_TOKEN)
    }

    /// Credit a coin directly, bypassing the states.
    pub fn deposit_coin(&mut self, token: &str) -> Result<u32, MachineError> {
        self.context.deposit_coin(token)
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn amount_inserted(&self) -> u32 {
        self.context.amount_inserted
    }

    pub fn change_due(&self) -> u32 {
        self.context.change_due
    }

    pub fn pending_event(&self) -> &str {
        self.context.pending_event()
    }

    pub fn session(&self) -> Option<Uuid> {
        self.context.session()
    }

    pub fn catalog(&self) -> &Catalog {
        self.context.catalog()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Drain notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.context.take_notifications()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.current,
            amount_inserted: self.context.amount_inserted,
            change_due: self.context.change_due,
        }
    }

    fn atomically<T>(
        &mut self,
        run: impl FnOnce(&mut Self) -> Result<T, MachineError>,
    ) -> Result<T, MachineError> {
        let current = self.current;
        let history = self.history.clone();
        let context = self.context.mark();

        match run(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(
                    error = %e,
                    state = current.map_or("none", |s| s.name()),
                    "step failed, rolled back"
                );
                self.current = current;
                self.history = history;
                self.context.restore(context);
                Err(e)
            }
        }
    }

    fn apply(&mut self, first: Transition) -> Result<(), MachineError> {
        let mut pending = Some(first);
        let mut hops = 0;

        while let Some(transition) = pending.take() {
            if hops == MAX_CHAINED_TRANSITIONS {
                return Err(MachineError::TransitionLimit {
                    limit: MAX_CHAINED_TRANSITIONS,
                });
            }
            hops += 1;

            let target = lookup(&self.states, transition.target)?;
            target.check_entry(&transition)?;

            if let Some(current) = self.current.and_then(|id| self.states.get(&id)) {
                current.on_exit(&mut self.context);
            }

            let from = self.current.replace(transition.target);
            let record = StateTransition {
                from,
                to: transition.target,
                timestamp: Utc::now(),
                session: self.context.session(),
            };
            debug!(
                from = from.map_or("none", |s| s.name()),
                to = transition.target.name(),
                starts_session = record.starts_session(),
                "transition"
            );
            self.history.record(record);

            pending = target.on_entry(&mut self.context, &transition)?;
        }
        Ok(())
    }
}

fn lookup(
    states: &HashMap<StateId, Box<dyn StateBehavior>>,
    id: StateId,
) -> Result<&dyn StateBehavior, MachineError> {
    states
        .get(&id)
        .map(|s| s.as_ref())
        .ok_or_else(|| MachineError::UnknownState {
            name: id.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MachineContext;
    use crate::states::{standard_states, Outcome, WaitingState};
    use std::sync::{Arc, Mutex};

    fn machine() -> VendingMachine {
        VendingMachine::standard().unwrap()
    }

    /// Counts exits of the wrapped state.
    struct CountingExit {
        inner: WaitingState,
        exits: Arc<Mutex<usize>>,
    }

    impl StateBehavior for CountingExit {
        fn id(&self) -> StateId {
            self.inner.id()
        }

        fn on_entry(&self, ctx: &mut MachineContext, transition: &Transition) -> Outcome {
            self.inner.on_entry(ctx, transition)
        }

        fn on_exit(&self, _ctx: &mut MachineContext) {
            *self.exits.lock().unwrap() += 1;
        }

        fn update(&self, ctx: &mut MachineContext) -> Outcome {
            self.inner.update(ctx)
        }
    }

    /// Entry always bounces back to itself.
    struct Bouncing;

    impl StateBehavior for Bouncing {
        fn id(&self) -> StateId {
            StateId::CountChange
        }

        fn on_entry(&self, _ctx: &mut MachineContext, _transition: &Transition) -> Outcome {
            Ok(Some(Transition::to(StateId::CountChange)))
        }
    }

    /// Count change whose entry hook always fails.
    struct BrokenCountChange;

    impl StateBehavior for BrokenCountChange {
        fn id(&self) -> StateId {
            StateId::CountChange
        }

        fn on_entry(&self, _ctx: &mut MachineContext, _transition: &Transition) -> Outcome {
            Err(MachineError::UnknownCoin {
                token: "jammed".to_string(),
            })
        }
    }

    fn machine_with_broken_count_change() -> VendingMachine {
        let mut machine = VendingMachine::new(Catalog::standard());
        for state in standard_states() {
            machine.register_state(state);
        }
        machine.register_state(Box::new(BrokenCountChange));
        machine.transition_to(StateId::Waiting).unwrap();
        machine
    }

    #[test]
    fn failed_chain_rolls_back_sale() {
        let mut machine = machine_with_broken_count_change();
        machine.handle("toonie").unwrap();
        let session = machine.session();
        let path = machine.history().get_path();

        let err = machine.handle("gum").unwrap_err();

        assert!(matches!(err, MachineError::UnknownCoin { .. }));
        assert_eq!(machine.current_state(), Some(StateId::AddCoins));
        assert_eq!(machine.amount_inserted(), 200);
        assert_eq!(machine.change_due(), 0);
        assert_eq!(machine.session(), session);
        assert_eq!(machine.history().get_path(), path);
        assert!(machine.take_notifications().is_empty());
    }

    #[test]
    fn failed_return_keeps_money_inserted() {
        let mut machine = machine_with_broken_count_change();
        machine.handle("25").unwrap();

        assert!(machine.press_return().is_err());

        assert_eq!(machine.current_state(), Some(StateId::AddCoins));
        assert_eq!(machine.amount_inserted(), 25);
        assert_eq!(machine.change_due(), 0);
    }

    #[test]
    fn failed_transition_to_keeps_current_state() {
        let mut machine = machine_with_broken_count_change();

        assert!(machine.transition_to(StateId::CountChange).is_err());

        assert_eq!(machine.current_state(), Some(StateId::Waiting));
        assert_eq!(machine.history().get_path(), vec![StateId::Waiting]);
    }

    #[test]
    fn exact_payment_still_succeeds_without_count_change() {
        let mut machine = machine_with_broken_count_change();
        machine.handle("25").unwrap();

        machine.handle("gum").unwrap();

        assert_eq!(machine.current_state(), Some(StateId::Waiting));
        assert_eq!(machine.amount_inserted(), 0);
    }

    #[test]
    fn standard_machine_starts_waiting() {
        let machine = machine();
        assert_eq!(machine.current_state(), Some(StateId::Waiting));
        assert_eq!(machine.amount_inserted(), 0);
        assert_eq!(machine.change_due(), 0);
        assert_eq!(machine.history().get_path(), vec![StateId::Waiting]);
    }

    #[test]
    fn step_without_state_is_noop() {
        let mut machine = VendingMachine::new(Catalog::standard());
        machine.set_event("25");

        assert_eq!(machine.step().unwrap(), StepResult::NotStarted);
        assert_eq!(machine.amount_inserted(), 0);
    }

    #[test]
    fn transition_to_unregistered_state_fails() {
        let mut machine = VendingMachine::new(Catalog::standard());
        machine.register_state(Box::new(WaitingState));

        let err = machine.transition_to(StateId::AddCoins).unwrap_err();

        assert_eq!(
            err,
            MachineError::UnknownState {
                name: "add_coins".to_string()
            }
        );
        assert_eq!(machine.current_state(), None);
    }

    #[test]
    fn deliver_without_selection_leaves_state_untouched() {
        let mut machine = machine();
        let err = machine.transition_to(StateId::DeliverProduct).unwrap_err();

        assert!(matches!(err, MachineError::MissingSelection { .. }));
        assert_eq!(machine.current_state(), Some(StateId::Waiting));
    }

    #[test]
    fn exit_hook_runs_on_transition() {
        let exits = Arc::new(Mutex::new(0));
        let mut machine = VendingMachine::new(Catalog::standard());
        for state in standard_states() {
            machine.register_state(state);
        }
        machine.register_state(Box::new(CountingExit {
            inner: WaitingState,
            exits: Arc::clone(&exits),
        }));
        machine.transition_to(StateId::Waiting).unwrap();
        assert_eq!(*exits.lock().unwrap(), 0);

        machine.handle("5").unwrap();

        assert_eq!(*exits.lock().unwrap(), 1);
        assert_eq!(machine.current_state(), Some(StateId::AddCoins));
    }

    #[test]
    fn runaway_chain_is_bounded() {
        let mut machine = VendingMachine::new(Catalog::standard());
        machine.register_state(Box::new(Bouncing));

        let err = machine.transition_to(StateId::CountChange).unwrap_err();

        assert_eq!(
            err,
            MachineError::TransitionLimit {
                limit: MAX_CHAINED_TRANSITIONS
            }
        );
        assert_eq!(machine.current_state(), None);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn step_reports_final_state_of_chain() {
        let mut machine = machine();
        machine.handle("loonie").unwrap();

        let result = machine.handle("candy").unwrap();

        assert_eq!(
            result,
            StepResult::Transitioned {
                from: StateId::AddCoins,
                to: StateId::Waiting
            }
        );
    }

    #[test]
    fn ignored_event_stays() {
        let mut machine = machine();
        assert_eq!(
            machine.handle("Exit").unwrap(),
            StepResult::Stayed(StateId::Waiting)
        );
    }

    #[test]
    fn pending_event_is_not_cleared() {
        let mut machine = machine();
        machine.handle("10").unwrap();
        assert_eq!(machine.pending_event(), "10");

        machine.step().unwrap();
        assert_eq!(machine.amount_inserted(), 20);
    }

    #[test]
    fn deposit_coin_guards_catalog() {
        let mut machine = machine();
        assert_eq!(machine.deposit_coin("toonie").unwrap(), 200);
        assert!(matches!(
            machine.deposit_coin("drink"),
            Err(MachineError::UnknownCoin { .. })
        ));
    }

    #[test]
    fn press_return_refunds() {
        let mut machine = machine();
        machine.handle("25").unwrap();
        machine.press_return().unwrap();

        assert_eq!(machine.current_state(), Some(StateId::CountChange));
        assert_eq!(machine.change_due(), 25);
    }

    #[test]
    fn re_registering_replaces_behavior() {
        let mut machine = VendingMachine::new(Catalog::standard());
        machine.register_state(Box::new(WaitingState));
        machine.register_state(Box::new(WaitingState));

        assert!(machine.is_registered(StateId::Waiting));
        assert!(!machine.is_registered(StateId::AddCoins));
    }
}
