//! Flowstate Store
//!
//! This crate provides the repository trait and implementations for state
//! machines and executions, keyed by UUID.
//!
//! The [`Repository`] trait defines operations for:
//! - Registering state machine definitions
//! - Registering and removing executions
//! - Recording an execution's current state (not implemented yet)

mod memory;

pub use memory::InMemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use flowstate_fsm::{Execution, StateMachine};
use uuid::Uuid;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// A record with this identifier is already registered.
  #[error("{kind} already exists: {id}")]
  AlreadyExists { kind: &'static str, id: Uuid },

  /// The requested record was not found.
  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: Uuid },

  /// The operation is a declared extension point with no implementation.
  #[error("{operation} is not implemented")]
  Unimplemented { operation: &'static str },
}

/// Storage for state machines and the executions running against them.
#[async_trait]
pub trait Repository: Send + Sync {
  /// Register a state machine. Fails if `id` is already registered.
  async fn add_state_machine(
    &self,
    id: Uuid,
    machine: Arc<StateMachine>,
  ) -> Result<(), StoreError>;

  /// Get a state machine by ID.
  async fn get_state_machine(&self, id: Uuid) -> Result<Arc<StateMachine>, StoreError>;

  /// Register an execution. Fails if `id` is already registered.
  async fn add_execution(&self, id: Uuid, execution: Execution) -> Result<(), StoreError>;

  /// Get an execution by ID.
  async fn get_execution(&self, id: Uuid) -> Result<Execution, StoreError>;

  /// Remove an execution. Removing an unknown execution succeeds.
  async fn remove_execution(&self, id: Uuid) -> Result<(), StoreError>;

  /// Record the state an execution is currently in.
  async fn update_execution(&self, id: Uuid, state: &str) -> Result<(), StoreError>;
}
