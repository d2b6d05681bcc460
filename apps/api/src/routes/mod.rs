pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::assessment::handlers as assessment;
use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let mut router = Router::new()
        .route("/health", get(health::health_handler))
        // Resume intake
        .route(
            "/api/upload-resume",
            post(resume::handle_upload_resume)
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        // Interview
        .route("/api/interview/opening", post(interview::handle_opening))
        .route("/api/interview/message", post(interview::handle_message))
        .route(
            "/api/interview/status/:session_id",
            get(interview::handle_status),
        )
        .route(
            "/api/interview/state/:session_id",
            get(interview::handle_state),
        )
        // Assessment
        .route(
            "/api/interview/report/:session_id",
            get(assessment::handle_report),
        );

    if config.enable_debug_routes {
        router = router.route("/debug/sessions", get(health::debug_sessions_handler));
    }

    router = match &config.frontend_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(health::root_handler)),
    };

    router.with_state(state)
}
