//! Shared fields the states operate on.

use crate::catalog::{Catalog, Product};
use crate::core::{Event, Notification};
use crate::machine::actuator::Actuator;
use crate::machine::error::MachineError;
use std::collections::VecDeque;
use tracing::{info, warn};
use uuid::Uuid;

/// Default number of notifications queued before the oldest is dropped.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 64;

/// Everything a state may read or mutate while the engine runs it.
///
/// The counters are public: states own the arithmetic. The catalog, the
/// pending event and the collaborators are only reachable through methods.
pub struct MachineContext {
    /// Money inserted in the current session, minor units
    pub amount_inserted: u32,
    /// Change owed to the customer, minor units
    pub change_due: u32,
    catalog: Catalog,
    pending_event: String,
    session: Option<Uuid>,
    notifications: VecDeque<Notification>,
    notification_limit: usize,
    actuator: Option<Box<dyn Actuator>>,
}

/// The parts of a context a failed step must put back.
pub(crate) struct ContextMark {
    amount_inserted: u32,
    change_due: u32,
    session: Option<Uuid>,
    notifications: VecDeque<Notification>,
}

impl MachineContext {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            amount_inserted: 0,
            change_due: 0,
            catalog,
            pending_event: String::new(),
            session: None,
            notifications: VecDeque::new(),
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            actuator: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pending_event(&self) -> &str {
        &self.pending_event
    }

    pub fn set_pending_event(&mut self, token: impl Into<String>) {
        self.pending_event = token.into();
    }

    /// Classify the pending event against the catalog.
    pub fn event(&self) -> Event<'_> {
        self.catalog.classify(&self.pending_event)
    }

    /// Add the value of the coin named by `token` to the inserted amount.
    ///
    /// Returns the new inserted amount.
    pub fn deposit_coin(&mut self, token: &str) -> Result<u32, MachineError> {
        let value = self
            .catalog
            .coin(token)
            .map(|c| c.value)
            .ok_or_else(|| MachineError::UnknownCoin {
                token: token.to_string(),
            })?;

        self.amount_inserted = self
            .amount_inserted
            .checked_add(value)
            .ok_or(MachineError::AmountOverflow { value })?;
        Ok(self.amount_inserted)
    }

    pub fn session(&self) -> Option<Uuid> {
        self.session
    }

    /// Open a new customer session and return its id.
    pub fn start_session(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.session = Some(id);
        id
    }

    pub fn end_session(&mut self) {
        self.session = None;
    }

    /// Queue a notification for the driver and log it.
    ///
    /// The queue keeps the newest `notification_limit` entries. A limit of
    /// zero only logs.
    pub fn notify(&mut self, notification: Notification) {
        info!(session = ?self.session, "{notification}");
        if self.notification_limit == 0 {
            return;
        }
        if self.notifications.len() == self.notification_limit {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn notifications(&self) -> &VecDeque<Notification> {
        &self.notifications
    }

    /// Change the queue bound, dropping the oldest entries that no longer fit.
    pub fn set_notification_limit(&mut self, limit: usize) {
        self.notification_limit = limit;
        let excess = self.notifications.len().saturating_sub(limit);
        self.notifications.drain(..excess);
    }

    pub(crate) fn mark(&self) -> ContextMark {
        ContextMark {
            amount_inserted: self.amount_inserted,
            change_due: self.change_due,
            session: self.session,
            notifications: self.notifications.clone(),
        }
    }

    pub(crate) fn restore(&mut self, mark: ContextMark) {
        self.amount_inserted = mark.amount_inserted;
        self.change_due = mark.change_due;
        self.session = mark.session;
        self.notifications = mark.notifications;
    }

    pub fn set_actuator(&mut self, actuator: Box<dyn Actuator>) {
        self.actuator = Some(actuator);
    }

    /// Drive the actuator, if any. Failures are logged, not returned.
    pub fn actuate(&mut self, product: &Product) {
        let Some(actuator) = self.actuator.as_mut() else {
            return;
        };
        if let Err(e) = actuator.dispense(product) {
            warn!(product = %product.token, error = %e, "dispense actuator failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::actuator::ActuatorError;

    #[test]
    fn deposit_adds_coin_value() {
        let mut ctx = MachineContext::new(Catalog::standard());
        assert_eq!(ctx.deposit_coin("25").unwrap(), 25);
        assert_eq!(ctx.deposit_coin("loonie").unwrap(), 125);
        assert_eq!(ctx.amount_inserted, 125);
    }

    #[test]
    fn deposit_rejects_unknown_coin() {
        let mut ctx = MachineContext::new(Catalog::standard());
        let err = ctx.deposit_coin("gum").unwrap_err();

        assert_eq!(
            err,
            MachineError::UnknownCoin {
                token: "gum".to_string()
            }
        );
        assert_eq!(ctx.amount_inserted, 0);
    }

    #[test]
    fn deposit_detects_overflow() {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.amount_inserted = u32::MAX - 1;

        let err = ctx.deposit_coin("5").unwrap_err();
        assert_eq!(err, MachineError::AmountOverflow { value: 5 });
        assert_eq!(ctx.amount_inserted, u32::MAX - 1);
    }

    #[test]
    fn notifications_are_drained() {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.notify(Notification::ChangeDue { amount: 5 });

        assert_eq!(ctx.notifications().len(), 1);
        assert_eq!(
            ctx.take_notifications(),
            vec![Notification::ChangeDue { amount: 5 }]
        );
        assert!(ctx.notifications().is_empty());
    }

    #[test]
    fn notification_queue_keeps_newest() {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.set_notification_limit(3);
        for amount in 1..=10 {
            ctx.notify(Notification::ChangeDue { amount });
        }

        assert_eq!(
            ctx.take_notifications(),
            vec![
                Notification::ChangeDue { amount: 8 },
                Notification::ChangeDue { amount: 9 },
                Notification::ChangeDue { amount: 10 },
            ]
        );
    }

    #[test]
    fn zero_notification_limit_queues_nothing() {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.set_notification_limit(0);
        ctx.notify(Notification::ChangeDue { amount: 5 });

        assert!(ctx.notifications().is_empty());
    }

    #[test]
    fn lowering_limit_drops_oldest() {
        let mut ctx = MachineContext::new(Catalog::standard());
        for amount in 1..=4 {
            ctx.notify(Notification::ChangeDue { amount });
        }
        ctx.set_notification_limit(1);

        assert_eq!(
            ctx.take_notifications(),
            vec![Notification::ChangeDue { amount: 4 }]
        );
    }

    #[test]
    fn restore_undoes_counters_session_and_notifications() {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.amount_inserted = 200;
        let mark = ctx.mark();

        ctx.start_session();
        ctx.amount_inserted = 0;
        ctx.change_due = 175;
        ctx.notify(Notification::ChangeDue { amount: 175 });
        ctx.restore(mark);

        assert_eq!(ctx.amount_inserted, 200);
        assert_eq!(ctx.change_due, 0);
        assert!(ctx.session().is_none());
        assert!(ctx.notifications().is_empty());
    }

    #[test]
    fn sessions_open_and_close() {
        let mut ctx = MachineContext::new(Catalog::standard());
        let id = ctx.start_session();
        assert_eq!(ctx.session(), Some(id));

        ctx.end_session();
        assert!(ctx.session().is_none());
    }

    #[test]
    fn failing_actuator_is_swallowed() {
        let mut ctx = MachineContext::new(Catalog::standard());
        ctx.set_actuator(Box::new(|_: &Product| {
            Err::<(), ActuatorError>(ActuatorError("jammed".to_string()))
        }));
        let gum = ctx.catalog().product("gum").cloned().unwrap();

        ctx.actuate(&gum);
        assert!(ctx.notifications().is_empty());
    }
}
