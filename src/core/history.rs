//! Transition history tracking.
//!
//! Every transition the engine applies is recorded with a timestamp and the
//! session it belongs to. The history is bounded: once full, the oldest
//! record is dropped.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Default number of transitions kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use coinbox::core::{StateId, StateTransition};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: Some(StateId::Waiting),
///     to: StateId::AddCoins,
///     timestamp: Utc::now(),
///     session: None,
/// };
/// assert!(transition.starts_session());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being left; `None` for the first transition of a machine
    pub from: Option<StateId>,
    /// The state being entered
    pub to: StateId,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
    /// Customer session active when the transition was applied
    pub session: Option<Uuid>,
}

impl StateTransition {
    /// Check if this transition leaves the resting state.
    pub fn starts_session(&self) -> bool {
        self.from.is_some_and(|s| s.is_resting()) && !self.to.is_resting()
    }
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use coinbox::core::{StateHistory, StateId, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(StateTransition {
///     from: None,
///     to: StateId::Waiting,
///     timestamp: Utc::now(),
///     session: None,
/// });
/// history.record(StateTransition {
///     from: Some(StateId::Waiting),
///     to: StateId::AddCoins,
///     timestamp: Utc::now(),
///     session: None,
/// });
///
/// assert_eq!(history.get_path(), vec![StateId::Waiting, StateId::AddCoins]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    limit: usize,
    transitions: VecDeque<StateTransition>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl StateHistory {
    /// Create an empty history keeping at most `limit` transitions.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
        }
    }

    /// Record a transition, evicting the oldest one if full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` of the oldest retained transition when there
    /// is one, then the `to` of each transition.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(from) = self.transitions.front().and_then(|t| t.from) {
            path.push(from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Path of the transitions recorded for one session.
    pub fn session_path(&self, session: Uuid) -> Vec<StateId> {
        self.transitions
            .iter()
            .filter(|t| t.session == Some(session))
            .map(|t| t.to)
            .collect()
    }

    /// Time between the oldest and newest retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition> + '_ {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
