//! In-memory entity with staged writes and transition history.

use crate::core::{ActionHistory, ActionRecord, Combination, EMPTY};
use crate::effects::entity::{BoxError, Entity};
use crate::effects::error::ActionError;
use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Failure reported by a [`MemoryEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryEntityError {
    #[error("memory entity lock poisoned")]
    Poisoned,

    #[error("injected {0} failure")]
    Injected(&'static str),
}

#[derive(Debug, Default)]
struct Inner {
    state: Combination,
    staged: Option<Combination>,
    history: ActionHistory,
    fail_start: bool,
    fail_get: bool,
    fail_set: bool,
    suppress: bool,
}

/// An [`Entity`] that keeps its combination in memory.
///
/// `set_state` only stages the new combination. `end_action` commits it when
/// the action succeeded and drops it otherwise, recording every commit in an
/// [`ActionHistory`]. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryEntity {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `state` instead of the empty combination.
    pub fn with_state(state: Combination) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                ..Inner::default()
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, MemoryEntityError> {
        self.inner.lock().map_err(|_| MemoryEntityError::Poisoned)
    }

    /// The committed combination.
    pub fn state(&self) -> Combination {
        self.lock().map(|inner| inner.state).unwrap_or(EMPTY)
    }

    /// Every committed action so far.
    pub fn history(&self) -> ActionHistory {
        self.lock()
            .map(|inner| inner.history.clone())
            .unwrap_or_default()
    }

    /// Make every following `start_action` fail.
    pub fn fail_start_action(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_start = fail;
        }
    }

    /// Make every following `get_state` fail.
    pub fn fail_get_state(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_get = fail;
        }
    }

    /// Make every following `set_state` fail.
    pub fn fail_set_state(&self, fail: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.fail_set = fail;
        }
    }

    /// Have `end_action` swallow errors instead of returning them.
    pub fn suppress_errors(&self, suppress: bool) {
        if let Ok(mut inner) = self.lock() {
            inner.suppress = suppress;
        }
    }
}

impl Entity for MemoryEntity {
    type Context = ();

    async fn start_action(&self, _ctx: &()) -> Result<(), BoxError> {
        let mut inner = self.lock()?;
        if inner.fail_start {
            return Err(MemoryEntityError::Injected("start_action").into());
        }
        inner.staged = None;
        Ok(())
    }

    async fn get_state(&self, _ctx: &()) -> Result<Combination, BoxError> {
        let inner = self.lock()?;
        if inner.fail_get {
            return Err(MemoryEntityError::Injected("get_state").into());
        }
        Ok(inner.state)
    }

    async fn set_state(&self, _ctx: &(), state: Combination, _opts: &[Value]) -> Result<(), BoxError> {
        let mut inner = self.lock()?;
        if inner.fail_set {
            return Err(MemoryEntityError::Injected("set_state").into());
        }
        inner.staged = Some(state);
        Ok(())
    }

    async fn end_action(&self, _ctx: (), error: Option<ActionError>) -> Result<(), ActionError> {
        let mut inner = self
            .lock()
            .map_err(|err| ActionError::Entity(Box::new(err)))?;
        let staged = inner.staged.take();

        match error {
            Some(_) if inner.suppress => Ok(()),
            Some(err) => Err(err),
            None => {
                if let Some(to) = staged {
                    let record = ActionRecord {
                        from: inner.state,
                        to,
                        timestamp: Utc::now(),
                    };
                    inner.history = inner.history.record(record);
                    inner.state = to;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_applies_staged_state() {
        let entity = MemoryEntity::new();

        entity.start_action(&()).await.unwrap();
        entity.set_state(&(), 3, &[]).await.unwrap();
        assert_eq!(entity.state(), 0);

        entity.end_action((), None).await.unwrap();

        assert_eq!(entity.state(), 3);
        assert_eq!(entity.history().get_path(), vec![0, 3]);
    }

    #[tokio::test]
    async fn error_discards_staged_state() {
        let entity = MemoryEntity::with_state(1);

        entity.start_action(&()).await.unwrap();
        entity.set_state(&(), 3, &[]).await.unwrap();
        let result = entity
            .end_action((), Some(ActionError::InvalidState { state: 1 }))
            .await;

        assert!(matches!(result, Err(ActionError::InvalidState { state: 1 })));
        assert_eq!(entity.state(), 1);
        assert!(entity.history().is_empty());
    }

    #[tokio::test]
    async fn suppressed_errors_still_roll_back() {
        let entity = MemoryEntity::with_state(1);
        entity.suppress_errors(true);

        entity.start_action(&()).await.unwrap();
        entity.set_state(&(), 3, &[]).await.unwrap();
        let result = entity
            .end_action((), Some(ActionError::InvalidState { state: 1 }))
            .await;

        assert!(result.is_ok());
        assert_eq!(entity.state(), 1);
    }

    #[tokio::test]
    async fn injected_failures() {
        let entity = MemoryEntity::new();
        entity.fail_start_action(true);
        entity.fail_get_state(true);
        entity.fail_set_state(true);

        let start = entity.start_action(&()).await.unwrap_err();
        let get = entity.get_state(&()).await.unwrap_err();
        let set = entity.set_state(&(), 1, &[]).await.unwrap_err();

        assert_eq!(start.to_string(), "injected start_action failure");
        assert_eq!(get.to_string(), "injected get_state failure");
        assert_eq!(set.to_string(), "injected set_state failure");
    }

    #[test]
    fn clones_share_state() {
        let entity = MemoryEntity::with_state(5);
        let other = entity.clone();

        assert_eq!(other.state(), 5);
    }
}
