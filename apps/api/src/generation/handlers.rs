//! Axum route handlers for the stateless Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::generation::boolean_query::build_boolean_query;
use crate::generation::suggestions::suggest_additional_skills;
use crate::language::Language;
use crate::schema::coerce_and_fill;
use crate::state::AppState;
use crate::wizard::handlers::GeneratedDocument;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BooleanQueryResponse {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub original: String,
    pub instructions: String,
    pub lang: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestSkillsRequest {
    pub job_title: String,
    #[serde(default)]
    pub existing: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestSkillsResponse {
    pub suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/boolean-query
///
/// Accepts a vacancy record, nested or flat, partial or complete.
pub async fn handle_boolean_query(
    Json(record): Json<Value>,
) -> Result<Json<BooleanQueryResponse>, AppError> {
    let record = coerce_and_fill(&record)?;
    Ok(Json(BooleanQueryResponse {
        query: build_boolean_query(&record),
    }))
}

/// POST /api/v1/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<GeneratedDocument>, AppError> {
    if request.original.trim().is_empty() {
        return Err(AppError::Validation("original cannot be empty".to_string()));
    }
    if request.instructions.trim().is_empty() {
        return Err(AppError::Validation(
            "instructions cannot be empty".to_string(),
        ));
    }
    let lang = request.lang.unwrap_or(state.config.default_language);

    let content = state
        .gateway
        .refine(&request.original, &request.instructions, lang)
        .await?;

    Ok(Json(GeneratedDocument { content }))
}

/// POST /api/v1/skills/suggest
pub async fn handle_suggest_skills(
    Json(request): Json<SuggestSkillsRequest>,
) -> Json<SuggestSkillsResponse> {
    Json(SuggestSkillsResponse {
        suggestions: suggest_additional_skills(&request.job_title, &request.existing),
    })
}
