pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

/// Uploaded job ads (docx/pdf) can exceed axum's 2 MB default.
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API
        .route("/api/v1/schema", get(extraction::handle_schema))
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route("/api/v1/company-info", post(extraction::handle_company_info))
        // Generation API
        .route(
            "/api/v1/boolean-query",
            post(generation::handle_boolean_query),
        )
        .route("/api/v1/refine", post(generation::handle_refine))
        .route(
            "/api/v1/skills/suggest",
            post(generation::handle_suggest_skills),
        )
        // Wizard API
        .route("/api/v1/sessions", post(wizard::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(wizard::handle_get_session).delete(wizard::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/fields",
            patch(wizard::handle_set_fields),
        )
        .route(
            "/api/v1/sessions/:id/list-items",
            post(wizard::handle_add_list_item),
        )
        .route(
            "/api/v1/sessions/:id/discovery",
            post(wizard::handle_discovery),
        )
        .route(
            "/api/v1/sessions/:id/company-info",
            post(wizard::handle_session_company_info),
        )
        .route("/api/v1/sessions/:id/next", post(wizard::handle_next))
        .route(
            "/api/v1/sessions/:id/previous",
            post(wizard::handle_previous),
        )
        .route(
            "/api/v1/sessions/:id/followups",
            get(wizard::handle_followups),
        )
        .route("/api/v1/sessions/:id/summary", get(wizard::handle_summary))
        .route("/api/v1/sessions/:id/job-ad", post(wizard::handle_job_ad))
        .route(
            "/api/v1/sessions/:id/interview-guide",
            post(wizard::handle_interview_guide),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state)
}
