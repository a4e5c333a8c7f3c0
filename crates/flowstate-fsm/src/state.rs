//! Workflow states.

use std::time::Duration;

use tracing::debug;

use crate::choice::Choice;
use crate::error::FsmError;
use crate::events::{ExecutionEvent, ExecutionNotifier, StateKind};
use crate::execution::Execution;

/// Reserved identifier that ends a run.
///
/// It is not a state: the driver stops as soon as a state returns it.
pub const END_STATE: &str = "EndState";

/// Does nothing and moves on to `next`.
#[derive(Debug, Clone, PartialEq)]
pub struct PassState {
  pub next: String,
}

/// Suspends the run for `delay`, then moves on to `next`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitDelayState {
  pub delay: Duration,
  pub next: String,
}

/// One `(condition, target)` pair of a [`ChoiceState`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceBranch {
  pub choice: Choice,
  pub next: String,
}

impl ChoiceBranch {
  pub fn new(choice: Choice, next: impl Into<String>) -> Self {
    Self {
      choice,
      next: next.into(),
    }
  }
}

/// Takes the first branch whose condition holds, otherwise `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceState {
  pub branches: Vec<ChoiceBranch>,
  pub default: String,
}

/// A node of the workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
  Pass(PassState),
  WaitDelay(WaitDelayState),
  Choice(ChoiceState),
}

impl State {
  pub fn pass(next: impl Into<String>) -> Self {
    State::Pass(PassState { next: next.into() })
  }

  pub fn wait(delay: Duration, next: impl Into<String>) -> Self {
    State::WaitDelay(WaitDelayState {
      delay,
      next: next.into(),
    })
  }

  pub fn choice(branches: Vec<ChoiceBranch>, default: impl Into<String>) -> Self {
    State::Choice(ChoiceState {
      branches,
      default: default.into(),
    })
  }

  pub fn kind(&self) -> StateKind {
    match self {
      State::Pass(_) => StateKind::Pass,
      State::WaitDelay(_) => StateKind::WaitDelay,
      State::Choice(_) => StateKind::Choice,
    }
  }

  /// Every identifier this state may transition to.
  pub fn targets(&self) -> Vec<&str> {
    match self {
      State::Pass(pass) => vec![pass.next.as_str()],
      State::WaitDelay(wait) => vec![wait.next.as_str()],
      State::Choice(choice) => choice
        .branches
        .iter()
        .map(|branch| branch.next.as_str())
        .chain(std::iter::once(choice.default.as_str()))
        .collect(),
    }
  }

  /// Execute the state and return the identifier of the next one.
  pub async fn execute(
    &self,
    state_id: &str,
    execution: &Execution,
    notifier: &dyn ExecutionNotifier,
  ) -> Result<String, FsmError> {
    notifier.notify(ExecutionEvent::StateEntered {
      execution_id: execution.id().to_string(),
      state_id: state_id.to_string(),
      kind: self.kind(),
    });

    match self {
      State::Pass(pass) => {
        debug!(state_id, next = %pass.next, "executing pass state");
        Ok(pass.next.clone())
      }
      State::WaitDelay(wait) => {
        debug!(state_id, delay = ?wait.delay, "executing wait state");
        notifier.notify(ExecutionEvent::Waiting {
          execution_id: execution.id().to_string(),
          state_id: state_id.to_string(),
          delay_ms: u64::try_from(wait.delay.as_millis()).unwrap_or(u64::MAX),
        });
        if !wait.delay.is_zero() {
          tokio::time::sleep(wait.delay).await;
        }
        Ok(wait.next.clone())
      }
      State::Choice(choice) => {
        for (index, branch) in choice.branches.iter().enumerate() {
          if branch.choice.evaluate(execution)? {
            debug!(state_id, branch = index, next = %branch.next, "choice branch taken");
            notifier.notify(ExecutionEvent::BranchTaken {
              execution_id: execution.id().to_string(),
              state_id: state_id.to_string(),
              branch: index,
              next: branch.next.clone(),
            });
            return Ok(branch.next.clone());
          }
        }

        debug!(state_id, next = %choice.default, "no choice branch matched, taking default");
        notifier.notify(ExecutionEvent::DefaultTaken {
          execution_id: execution.id().to_string(),
          state_id: state_id.to_string(),
          next: choice.default.clone(),
        });
        Ok(choice.default.clone())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Instant;

  use super::*;
  use crate::events::{CollectingNotifier, NoopNotifier};
  use crate::operator::Operator;
  use serde_json::json;

  fn execution() -> Execution {
    Execution::from_value(&json!({ "a": "yes", "b": "no", "n": "NaN?" }))
  }

  fn holds() -> Choice {
    Choice::base("$.a", Operator::StringEquals("yes".to_string()))
  }

  fn fails() -> Choice {
    Choice::base("$.b", Operator::StringEquals("yes".to_string()))
  }

  fn errors() -> Choice {
    Choice::base("$.missing", Operator::StringEquals("yes".to_string()))
  }

  async fn run(state: &State) -> Result<String, FsmError> {
    state.execute("s", &execution(), &NoopNotifier).await
  }

  #[tokio::test]
  async fn test_pass_returns_next() {
    assert_eq!(run(&State::pass("B")).await.unwrap(), "B");
  }

  #[tokio::test]
  async fn test_wait_zero_delay() {
    let started = Instant::now();
    let next = run(&State::wait(Duration::ZERO, "B")).await.unwrap();

    assert_eq!(next, "B");
    assert!(started.elapsed() < Duration::from_millis(50));
  }

  #[tokio::test]
  async fn test_wait_blocks_for_delay() {
    let delay = Duration::from_millis(30);
    let started = Instant::now();
    let next = run(&State::wait(delay, "B")).await.unwrap();

    assert_eq!(next, "B");
    assert!(started.elapsed() >= delay);
  }

  #[tokio::test]
  async fn test_choice_first_true_branch_wins() {
    let state = State::choice(
      vec![ChoiceBranch::new(holds(), "B"), ChoiceBranch::new(holds(), "C")],
      "D",
    );
    assert_eq!(run(&state).await.unwrap(), "B");

    // Later branches are not evaluated once one matches.
    let state = State::choice(
      vec![ChoiceBranch::new(holds(), "B"), ChoiceBranch::new(errors(), "C")],
      "D",
    );
    assert_eq!(run(&state).await.unwrap(), "B");
  }

  #[tokio::test]
  async fn test_choice_second_branch() {
    let state = State::choice(
      vec![ChoiceBranch::new(fails(), "B"), ChoiceBranch::new(holds(), "C")],
      "D",
    );
    assert_eq!(run(&state).await.unwrap(), "C");
  }

  #[tokio::test]
  async fn test_choice_default() {
    let state = State::choice(
      vec![ChoiceBranch::new(fails(), "B"), ChoiceBranch::new(fails(), "C")],
      "D",
    );
    assert_eq!(run(&state).await.unwrap(), "D");

    assert_eq!(run(&State::choice(vec![], "D")).await.unwrap(), "D");
  }

  #[tokio::test]
  async fn test_choice_error_aborts_state() {
    let state = State::choice(
      vec![ChoiceBranch::new(errors(), "B"), ChoiceBranch::new(holds(), "C")],
      "D",
    );
    assert!(matches!(run(&state).await, Err(FsmError::NoMatch { .. })));
  }

  #[tokio::test]
  async fn test_events_emitted() {
    let notifier = CollectingNotifier::new();
    let exec = execution();
    let state = State::choice(vec![ChoiceBranch::new(fails(), "B")], "D");

    state.execute("route", &exec, &notifier).await.unwrap();

    assert_eq!(
      notifier.take(),
      vec![
        ExecutionEvent::StateEntered {
          execution_id: exec.id().to_string(),
          state_id: "route".to_string(),
          kind: StateKind::Choice,
        },
        ExecutionEvent::DefaultTaken {
          execution_id: exec.id().to_string(),
          state_id: "route".to_string(),
          next: "D".to_string(),
        },
      ]
    );
  }

  #[test]
  fn test_targets() {
    let state = State::choice(
      vec![ChoiceBranch::new(holds(), "B"), ChoiceBranch::new(fails(), "C")],
      "D",
    );
    assert_eq!(state.targets(), vec!["B", "C", "D"]);
    assert_eq!(State::pass("X").targets(), vec!["X"]);
  }
}
