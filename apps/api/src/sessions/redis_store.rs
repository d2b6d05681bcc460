use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::interview::agent::InterviewSession;
use crate::sessions::{SessionError, SessionStore};

const KEY_PREFIX: &str = "interview:session:";

/// Redis-backed session store. Each session is a JSON string with a TTL that
/// is refreshed on every save.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis session store connected");
        Ok(Self { conn, ttl_secs })
    }
}

fn session_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}{session_id}")
}

fn session_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &InterviewSession) -> Result<(), SessionError> {
        let payload = serde_json::to_string(session)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(session_key(&session.session_id), payload, self.ttl_secs)
            .await?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, SessionError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(session_key(session_id)).await?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(SessionError::from)
    }

    async fn list_ids(&self) -> Result<Vec<String>, SessionError> {
        let mut conn = self.conn.clone();
        let mut keys = conn
            .scan_match::<_, String>(format!("{KEY_PREFIX}*"))
            .await?;
        let mut ids = Vec::new();
        while let Some(key) = keys.next_item().await {
            if let Some(id) = session_id_from_key(&key) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn count(&self) -> Result<usize, SessionError> {
        Ok(self.list_ids().await?.len())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_round_trip() {
        let key = session_key("abc-123");
        assert_eq!(key, "interview:session:abc-123");
        assert_eq!(session_id_from_key(&key), Some("abc-123"));
        assert_eq!(session_id_from_key("other:abc"), None);
    }
}
