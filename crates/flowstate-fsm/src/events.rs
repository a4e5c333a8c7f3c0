//! Execution events and notifiers for observability.
//!
//! States and the driver report progress through an [`ExecutionNotifier`]
//! instead of logging directly, so hosts decide what to do with it (print,
//! persist, stream, ignore).

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// The kind of a state, carried in events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
  Pass,
  WaitDelay,
  Choice,
}

/// Events emitted while a state machine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
  /// The driver is about to execute the start state.
  ExecutionStarted {
    execution_id: String,
    start_at: String,
  },

  /// A state has started executing.
  StateEntered {
    execution_id: String,
    state_id: String,
    kind: StateKind,
  },

  /// A wait state is suspending the run.
  Waiting {
    execution_id: String,
    state_id: String,
    delay_ms: u64,
  },

  /// A choice state matched one of its branches.
  BranchTaken {
    execution_id: String,
    state_id: String,
    branch: usize,
    next: String,
  },

  /// A choice state matched none of its branches.
  DefaultTaken {
    execution_id: String,
    state_id: String,
    next: String,
  },

  /// The run reached the terminal state.
  ExecutionCompleted {
    execution_id: String,
    transitions: usize,
  },

  /// The run used up its transition budget before reaching the terminal state.
  TransitionLimitReached {
    execution_id: String,
    max_execution: usize,
    state_id: String,
  },

  /// The run was aborted by an error.
  ExecutionFailed { execution_id: String, error: String },
}

/// Trait for receiving execution events.
pub trait ExecutionNotifier: Send + Sync {
  /// Called when an execution event occurs.
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// Use this when events are consumed asynchronously by another task.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}

/// A notifier that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
  events: Mutex<Vec<ExecutionEvent>>,
}

impl CollectingNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  /// Take all events collected so far.
  pub fn take(&self) -> Vec<ExecutionEvent> {
    match self.events.lock() {
      Ok(mut events) => std::mem::take(&mut *events),
      Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    }
  }
}

impl ExecutionNotifier for CollectingNotifier {
  fn notify(&self, event: ExecutionEvent) {
    match self.events.lock() {
      Ok(mut events) => events.push(event),
      Err(poisoned) => poisoned.into_inner().push(event),
    }
  }
}
