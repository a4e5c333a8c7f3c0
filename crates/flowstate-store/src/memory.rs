use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use flowstate_fsm::{Execution, StateMachine};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Repository, StoreError};

/// In-memory repository.
///
/// Suitable for a single host process or testing; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  state_machines: RwLock<HashMap<Uuid, Arc<StateMachine>>>,
  executions: RwLock<HashMap<Uuid, Execution>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of registered executions.
  pub async fn execution_count(&self) -> usize {
    self.executions.read().await.len()
  }
}

#[async_trait]
impl Repository for InMemoryStore {
  async fn add_state_machine(
    &self,
    id: Uuid,
    machine: Arc<StateMachine>,
  ) -> Result<(), StoreError> {
    match self.state_machines.write().await.entry(id) {
      Entry::Occupied(_) => Err(StoreError::AlreadyExists {
        kind: "state machine",
        id,
      }),
      Entry::Vacant(slot) => {
        slot.insert(machine);
        Ok(())
      }
    }
  }

  async fn get_state_machine(&self, id: Uuid) -> Result<Arc<StateMachine>, StoreError> {
    self
      .state_machines
      .read()
      .await
      .get(&id)
      .cloned()
      .ok_or(StoreError::NotFound {
        kind: "state machine",
        id,
      })
  }

  async fn add_execution(&self, id: Uuid, execution: Execution) -> Result<(), StoreError> {
    match self.executions.write().await.entry(id) {
      Entry::Occupied(_) => Err(StoreError::AlreadyExists {
        kind: "execution",
        id,
      }),
      Entry::Vacant(slot) => {
        slot.insert(execution);
        Ok(())
      }
    }
  }

  async fn get_execution(&self, id: Uuid) -> Result<Execution, StoreError> {
    self
      .executions
      .read()
      .await
      .get(&id)
      .cloned()
      .ok_or(StoreError::NotFound {
        kind: "execution",
        id,
      })
  }

  async fn remove_execution(&self, id: Uuid) -> Result<(), StoreError> {
    self.executions.write().await.remove(&id);
    Ok(())
  }

  async fn update_execution(&self, _id: Uuid, _state: &str) -> Result<(), StoreError> {
    Err(StoreError::Unimplemented {
      operation: "update_execution",
    })
  }
}
