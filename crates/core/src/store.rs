//! Workflow state store seam.
//!
//! Persistence is owned by the host; the core only requires keyed
//! access with atomic per-key read-modify-write so rapid successive
//! messages from one user cannot lose updates. Records are created
//! lazily on first access and never removed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::domain::{UserId, WorkflowState};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("workflow store unavailable: {0}")]
    Unavailable(String),
}

pub trait WorkflowStore: Send + Sync {
    /// Runs `apply` against the user's record under the store's write
    /// lock. The record is created with default values if absent.
    fn update<R, F>(&self, user: &UserId, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut WorkflowState) -> R;

    /// Read-only copy of the user's record, creating the default record
    /// if the user was never seen before.
    fn snapshot(&self, user: &UserId) -> Result<WorkflowState, StoreError>;

    /// Every user with a record, in stable order.
    fn known_users(&self) -> Result<Vec<UserId>, StoreError>;
}

/// Reference store used for the default wiring and in tests. Clones
/// share one underlying map, which mirrors the host store being a
/// single shared collaborator.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWorkflowStore {
    records: Arc<Mutex<HashMap<UserId, WorkflowState>>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn update<R, F>(&self, user: &UserId, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut WorkflowState) -> R,
    {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_owned()))?;
        let state = records.entry(user.clone()).or_default();
        Ok(apply(state))
    }

    fn snapshot(&self, user: &UserId) -> Result<WorkflowState, StoreError> {
        self.update(user, |state| state.clone())
    }

    fn known_users(&self) -> Result<Vec<UserId>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_owned()))?;
        let mut users: Vec<UserId> = records.keys().cloned().collect();
        users.sort();
        Ok(users)
    }
}
