//! The state machine driver.

use std::collections::HashMap;

use tracing::{debug, error, info, instrument, warn};

use crate::error::FsmError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::execution::Execution;
use crate::state::{END_STATE, State};

/// A transition target that does not name any state of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTarget {
  /// State holding the reference, `None` for `start_at`.
  pub state_id: Option<String>,
  pub target: String,
}

/// A workflow graph: named states, a start state and a transition budget.
///
/// Read-only once built, so one machine can drive any number of concurrent
/// executions (share it behind an `Arc`).
#[derive(Debug, Clone, PartialEq)]
pub struct StateMachine {
  states: HashMap<String, State>,
  start_at: String,
  max_execution: usize,
}

impl StateMachine {
  /// Build a state machine.
  ///
  /// Only the transition budget is checked; unknown targets surface as
  /// [`FsmError::UnknownState`] when a run reaches them.
  pub fn new(
    states: HashMap<String, State>,
    start_at: impl Into<String>,
    max_execution: usize,
  ) -> Result<Self, FsmError> {
    if max_execution == 0 {
      return Err(FsmError::InvalidDefinition {
        message: "max_execution must be greater than zero".to_string(),
      });
    }

    Ok(Self {
      states,
      start_at: start_at.into(),
      max_execution,
    })
  }

  pub fn states(&self) -> &HashMap<String, State> {
    &self.states
  }

  pub fn get_state(&self, state_id: &str) -> Option<&State> {
    self.states.get(state_id)
  }

  pub fn start_at(&self) -> &str {
    &self.start_at
  }

  pub fn max_execution(&self) -> usize {
    self.max_execution
  }

  /// Run `execution` to the terminal state, discarding events.
  pub async fn execute(&self, execution: &Execution) -> Result<String, FsmError> {
    self.execute_with(execution, &NoopNotifier).await
  }

  /// Run `execution` to the terminal state, reporting progress to `notifier`.
  ///
  /// Returns [`END_STATE`] on success. A run that exhausts `max_execution`
  /// transitions without reaching the terminal state also returns
  /// [`END_STATE`]; it is reported through a
  /// [`ExecutionEvent::TransitionLimitReached`] event and a warning.
  #[instrument(
    name = "state_machine_execute",
    skip_all,
    fields(execution_id = %execution.id(), start_at = %self.start_at)
  )]
  pub async fn execute_with(
    &self,
    execution: &Execution,
    notifier: &dyn ExecutionNotifier,
  ) -> Result<String, FsmError> {
    info!("execution_started");
    notifier.notify(ExecutionEvent::ExecutionStarted {
      execution_id: execution.id().to_string(),
      start_at: self.start_at.clone(),
    });

    let result = self.run_loop(execution, notifier).await;

    if let Err(e) = &result {
      error!(error = %e, "execution_failed");
      notifier.notify(ExecutionEvent::ExecutionFailed {
        execution_id: execution.id().to_string(),
        error: e.to_string(),
      });
    }

    result
  }

  async fn run_loop(
    &self,
    execution: &Execution,
    notifier: &dyn ExecutionNotifier,
  ) -> Result<String, FsmError> {
    let mut current = self.start_at.clone();

    for transition in 1..=self.max_execution {
      let state = self
        .states
        .get(&current)
        .ok_or_else(|| FsmError::UnknownState {
          state_id: current.clone(),
        })?;

      let next = state.execute(&current, execution, notifier).await?;
      debug!(from = %current, to = %next, transition, "transition");

      if next == END_STATE {
        info!(transitions = transition, "execution_completed");
        notifier.notify(ExecutionEvent::ExecutionCompleted {
          execution_id: execution.id().to_string(),
          transitions: transition,
        });
        return Ok(END_STATE.to_string());
      }

      current = next;
    }

    warn!(
      max_execution = self.max_execution,
      state_id = %current,
      "transition limit reached before the terminal state, reporting completion"
    );
    notifier.notify(ExecutionEvent::TransitionLimitReached {
      execution_id: execution.id().to_string(),
      max_execution: self.max_execution,
      state_id: current,
    });

    Ok(END_STATE.to_string())
  }

  /// List transition targets that name neither a state nor [`END_STATE`].
  ///
  /// Runs never call this; it is an opt-in check for hosts.
  pub fn unresolved_targets(&self) -> Vec<UnresolvedTarget> {
    let resolves = |target: &str| target == END_STATE || self.states.contains_key(target);
    let mut unresolved = Vec::new();

    if !resolves(self.start_at.as_str()) {
      unresolved.push(UnresolvedTarget {
        state_id: None,
        target: self.start_at.clone(),
      });
    }

    let mut state_ids: Vec<&String> = self.states.keys().collect();
    state_ids.sort();

    for state_id in state_ids {
      for target in self.states[state_id].targets() {
        if !resolves(target) {
          unresolved.push(UnresolvedTarget {
            state_id: Some(state_id.clone()),
            target: target.to_string(),
          });
        }
      }
    }

    unresolved
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::events::CollectingNotifier;
  use serde_json::json;

  fn machine(states: Vec<(&str, State)>, start_at: &str, max_execution: usize) -> StateMachine {
    let states = states
      .into_iter()
      .map(|(id, state)| (id.to_string(), state))
      .collect();
    StateMachine::new(states, start_at, max_execution).unwrap()
  }

  fn execution() -> Execution {
    Execution::from_value(&json!({}))
  }

  #[test]
  fn test_zero_bound_rejected() {
    let result = StateMachine::new(HashMap::new(), "a", 0);
    assert!(matches!(result, Err(FsmError::InvalidDefinition { .. })));
  }

  #[tokio::test]
  async fn test_linear_run() {
    let sm = machine(
      vec![("a", State::pass("b")), ("b", State::pass(END_STATE))],
      "a",
      10,
    );
    let notifier = CollectingNotifier::new();
    let exec = execution();

    assert_eq!(sm.execute_with(&exec, &notifier).await.unwrap(), END_STATE);

    let events = notifier.take();
    assert_eq!(
      events.last(),
      Some(&ExecutionEvent::ExecutionCompleted {
        execution_id: exec.id().to_string(),
        transitions: 2,
      })
    );
  }

  #[tokio::test]
  async fn test_follows_returned_transitions() {
    // "a" must not be executed twice: the driver follows "b" after it.
    let sm = machine(
      vec![("a", State::pass("b")), ("b", State::pass(END_STATE))],
      "a",
      10,
    );
    let notifier = CollectingNotifier::new();
    sm.execute_with(&execution(), &notifier).await.unwrap();

    let entered: Vec<String> = notifier
      .take()
      .into_iter()
      .filter_map(|event| match event {
        ExecutionEvent::StateEntered { state_id, .. } => Some(state_id),
        _ => None,
      })
      .collect();
    assert_eq!(entered, vec!["a", "b"]);
  }

  #[tokio::test]
  async fn test_missing_start_state() {
    let sm = machine(vec![("a", State::pass(END_STATE))], "nope", 10);
    let notifier = CollectingNotifier::new();

    let result = sm.execute_with(&execution(), &notifier).await;

    assert!(matches!(result, Err(FsmError::UnknownState { state_id }) if state_id == "nope"));
    assert!(matches!(
      notifier.take().last(),
      Some(ExecutionEvent::ExecutionFailed { .. })
    ));
  }

  #[tokio::test]
  async fn test_unknown_transition_target() {
    let sm = machine(vec![("a", State::pass("ghost"))], "a", 10);

    let result = sm.execute(&execution()).await;
    assert!(matches!(result, Err(FsmError::UnknownState { state_id }) if state_id == "ghost"));
  }

  #[tokio::test]
  async fn test_transition_limit_reports_end_state() {
    let sm = machine(
      vec![("a", State::pass("b")), ("b", State::pass("a"))],
      "a",
      5,
    );
    let notifier = CollectingNotifier::new();
    let exec = execution();

    assert_eq!(sm.execute_with(&exec, &notifier).await.unwrap(), END_STATE);

    let events = notifier.take();
    let entered = events
      .iter()
      .filter(|event| matches!(event, ExecutionEvent::StateEntered { .. }))
      .count();
    assert_eq!(entered, 5);
    assert_eq!(
      events.last(),
      Some(&ExecutionEvent::TransitionLimitReached {
        execution_id: exec.id().to_string(),
        max_execution: 5,
        state_id: "b".to_string(),
      })
    );
  }

  #[tokio::test]
  async fn test_end_state_on_last_allowed_transition() {
    let sm = machine(
      vec![("a", State::pass("b")), ("b", State::pass(END_STATE))],
      "a",
      2,
    );
    let notifier = CollectingNotifier::new();
    sm.execute_with(&execution(), &notifier).await.unwrap();

    assert!(matches!(
      notifier.take().last(),
      Some(ExecutionEvent::ExecutionCompleted { transitions: 2, .. })
    ));
  }

  #[test]
  fn test_unresolved_targets() {
    let sm = machine(
      vec![
        ("a", State::pass("b")),
        ("b", State::pass("ghost")),
        ("c", State::pass(END_STATE)),
      ],
      "start",
      10,
    );

    assert_eq!(
      sm.unresolved_targets(),
      vec![
        UnresolvedTarget {
          state_id: None,
          target: "start".to_string(),
        },
        UnresolvedTarget {
          state_id: Some("b".to_string()),
          target: "ghost".to_string(),
        },
      ]
    );
  }

  #[test]
  fn test_machine_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateMachine>();
  }
}
