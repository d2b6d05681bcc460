use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interview::agent::InterviewSession;
use crate::sessions::{SessionError, SessionStore};

struct Entry {
    session: InterviewSession,
    touched_at: Instant,
}

/// Process-local session map. Sessions are lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops sessions not saved or read within `ttl`. Returns how many were removed.
    pub async fn prune_expired(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched_at.elapsed() < ttl);
        before - sessions.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &InterviewSession) -> Result<(), SessionError> {
        self.sessions.write().await.insert(
            session.session_id.clone(),
            Entry {
                session: session.clone(),
                touched_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, SessionError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.get_mut(session_id).map(|entry| {
            entry.touched_at = Instant::now();
            entry.session.clone()
        }))
    }

    async fn list_ids(&self) -> Result<Vec<String>, SessionError> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn count(&self) -> Result<usize, SessionError> {
        Ok(self.sessions.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateProfile;

    fn session() -> InterviewSession {
        let profile: CandidateProfile = serde_json::from_str(r#"{"name": "Linus"}"#).unwrap();
        InterviewSession::new(profile, "Kernel Engineer")
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemorySessionStore::new();
        let s = session();
        store.save(&s).await.unwrap();

        let loaded = store.get(&s.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.candidate_profile.name, "Linus");
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.list_ids().await.unwrap(), vec![s.session_id.clone()]);
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let store = MemorySessionStore::new();
        let mut s = session();
        store.save(&s).await.unwrap();
        s.total_questions = 4;
        store.save(&s).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(
            store.get(&s.session_id).await.unwrap().unwrap().total_questions,
            4
        );
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let store = MemorySessionStore::new();
        store.save(&session()).await.unwrap();
        store.save(&session()).await.unwrap();

        assert_eq!(store.prune_expired(Duration::from_secs(3600)).await, 0);
        assert_eq!(store.prune_expired(Duration::ZERO).await, 2);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
