//! Session storage for in-flight interviews.
//!
//! `AppState` holds an `Arc<dyn SessionStore>`: the in-memory store by
//! default, Redis when `REDIS_URL` is configured.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

use crate::interview::agent::InterviewSession;

pub mod memory;
pub mod redis_store;

pub use self::memory::MemorySessionStore;
pub use self::redis_store::RedisSessionStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts or replaces a session.
    async fn save(&self, session: &InterviewSession) -> Result<(), SessionError>;

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, SessionError>;

    async fn list_ids(&self) -> Result<Vec<String>, SessionError>;

    async fn count(&self) -> Result<usize, SessionError>;

    fn backend_name(&self) -> &'static str;
}

/// Per-session async locks so that two turns for the same interview never
/// interleave their read-modify-write against the store.
#[derive(Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Entries only referenced by the map are idle.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks
                .entry(session_id.to_string())
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_session_turns_are_serialized() {
        let locks = Arc::new(SessionLocks::default());
        let guard = locks.acquire("s1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire("s1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_distinct_sessions_do_not_block() {
        let locks = SessionLocks::default();
        let _a = locks.acquire("a").await;
        let _b = locks.acquire("b").await;
        assert_eq!(locks.tracked(), 2);
    }

    #[tokio::test]
    async fn test_idle_locks_are_reclaimed() {
        let locks = SessionLocks::default();
        drop(locks.acquire("a").await);
        drop(locks.acquire("b").await);
        let _c = locks.acquire("c").await;
        assert_eq!(locks.tracked(), 1);
    }
}
