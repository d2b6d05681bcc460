use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::resume::pdf::PdfSettings;
use crate::sessions::{SessionLocks, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Production: `NimClient`.
    pub llm: Arc<dyn ChatModel>,
    /// Interview sessions. Memory by default, Redis when `REDIS_URL` is set.
    pub sessions: Arc<dyn SessionStore>,
    pub session_locks: Arc<SessionLocks>,
    pub pdf_settings: PdfSettings,
    pub config: Config,
}
