//! Session context store.
//!
//! One record per conversation, created empty on first touch and merged
//! field by field. Lifetime belongs to the hosting runtime, which calls
//! [`ContextStore::end`] when the conversation is over.

use std::collections::HashMap;
use std::sync::Mutex;

use civic_core::types::{ContextUpdate, SessionContext, SessionId, Timestamp};

use crate::error::SessionError;

/// Per-session key/value memory. The merge in `set` is the only mutation path.
pub trait ContextStore: Send + Sync {
    /// The session's context, or an empty one if nothing is stored yet.
    fn get(&self, session: SessionId) -> SessionContext;

    /// Merge `update` into the session's record, last write wins per field.
    fn set(&self, session: SessionId, update: ContextUpdate) -> Result<(), SessionError>;

    /// Drop the session's record. Returns whether one existed.
    fn end(&self, session: SessionId) -> Result<bool, SessionError>;
}

/// A stored context plus bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub context: SessionContext,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Process-local store backed by a mutex-guarded map.
pub struct InMemoryContextStore {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Full record for a session, including timestamps.
    pub fn record(&self, session: SessionId) -> Option<SessionRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|r| r.get(&session).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore for InMemoryContextStore {
    fn get(&self, session: SessionId) -> SessionContext {
        match self.records.lock() {
            Ok(records) => records
                .get(&session)
                .map(|r| r.context.clone())
                .unwrap_or_default(),
            Err(e) => {
                tracing::error!(session = %session, "Session lock poisoned: {}", e);
                SessionContext::default()
            }
        }
    }

    fn set(&self, session: SessionId, update: ContextUpdate) -> Result<(), SessionError> {
        if update.is_empty() {
            return Ok(());
        }

        let mut records = self
            .records
            .lock()
            .map_err(|e| SessionError::StorageError(format!("session lock poisoned: {}", e)))?;

        let now = Timestamp::now();
        let record = records.entry(session).or_insert_with(|| SessionRecord {
            context: SessionContext::default(),
            created_at: now,
            updated_at: now,
        });
        record.context.apply(update);
        record.updated_at = now;
        Ok(())
    }

    fn end(&self, session: SessionId) -> Result<bool, SessionError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SessionError::StorageError(format!("session lock poisoned: {}", e)))?;
        Ok(records.remove(&session).is_some())
    }
}
