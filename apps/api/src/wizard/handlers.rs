//! Axum route handlers for wizard sessions.
//!
//! Model calls never run under the session lock: a handler reads what it
//! needs, releases the store, calls the gateway, then writes back.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::company::CompanyInfo;
use crate::extraction::sources::read_document;
use crate::generation::prompts::Tone;
use crate::language::Language;
use crate::llm_client::GenerationModel;
use crate::questions::{followup_questions, FollowupQuestion};
use crate::schema::{coerce_and_fill, FieldPath, FlatRecord, Step, CRITICAL_FIELDS};
use crate::state::AppState;
use crate::wizard::session::{DiscoveryInput, WizardError, WizardSession};
use crate::wizard::summary::SessionSummary;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub lang: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct ListItemRequest {
    pub field: FieldPath,
    pub item: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<Language>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobAdRequest {
    #[serde(default)]
    pub tone: Tone,
    pub lang: Option<Language>,
    pub model: Option<GenerationModel>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InterviewGuideRequest {
    pub lang: Option<Language>,
    pub model: Option<GenerationModel>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub language: Language,
    pub step: Step,
    pub step_index: usize,
    pub step_title: &'static str,
    pub step_fields: Vec<FieldPath>,
    pub extraction_complete: bool,
    pub state: FlatRecord,
    /// Critical fields of the current step that still block `next`.
    pub missing_for_step: Vec<FieldPath>,
    pub missing_critical: Vec<FieldPath>,
    pub job_ad: Option<String>,
    pub interview_guide: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&WizardSession> for SessionView {
    fn from(session: &WizardSession) -> Self {
        Self {
            id: session.id,
            language: session.language,
            step: session.step,
            step_index: session.step.index(),
            step_title: session.step.title(session.language),
            step_fields: session.step.fields(),
            extraction_complete: session.extraction_complete,
            state: session.state.clone(),
            missing_for_step: session.missing_for_step(),
            missing_critical: session.missing_critical(),
            job_ad: session.job_ad.clone(),
            interview_guide: session.interview_guide.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListItemResponse {
    pub field: FieldPath,
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyInfoResponse {
    pub info: CompanyInfo,
    pub updated: Vec<FieldPath>,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct GeneratedDocument {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

async fn load(state: &AppState, id: Uuid) -> Result<WizardSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))
}

/// Applies `f` to the stored session and returns the updated view.
async fn mutate(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut WizardSession) -> Result<(), WizardError>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .update(id, |session| f(session).map(|()| SessionView::from(&*session)))
        .await
        .ok_or_else(|| session_not_found(id))??;
    Ok(Json(view))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> (StatusCode, Json<SessionView>) {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let language = request.lang.unwrap_or(state.config.default_language);
    let session = state.sessions.create(language).await;
    info!("Created wizard session {} (lang={language})", session.id);
    (StatusCode::CREATED, Json(SessionView::from(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = load(&state, id).await?;
    Ok(Json(SessionView::from(&session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// PATCH /api/v1/sessions/:id/fields
///
/// Body is a flat object of dotted keys. Unknown keys and ill-typed values
/// reject the whole patch.
pub async fn handle_set_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(values): Json<Map<String, Value>>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&state, id, |session| session.set_fields(&values)).await
}

/// POST /api/v1/sessions/:id/list-items
pub async fn handle_add_list_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ListItemRequest>,
) -> Result<Json<ListItemResponse>, AppError> {
    let items = state
        .sessions
        .update(id, |session| session.add_list_item(request.field, &request.item))
        .await
        .ok_or_else(|| session_not_found(id))??;
    Ok(Json(ListItemResponse {
        field: request.field,
        items,
    }))
}

/// POST /api/v1/sessions/:id/discovery
///
/// Multipart form with optional `file` (txt/docx/pdf), `url` and
/// `job_title`. File text and page text are concatenated and extracted;
/// with neither, a job title alone starts manual entry.
pub async fn handle_discovery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let language = load(&state, id).await?.language;

    let mut upload: Option<(String, bytes::Bytes)> = None;
    let mut url = String::new();
    let mut job_title: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    upload = Some((filename, data));
                }
            }
            "url" => url = field.text().await?,
            "job_title" => job_title = Some(field.text().await?),
            _ => {}
        }
    }

    let mut raw_text = match upload {
        Some((filename, data)) => {
            tokio::task::spawn_blocking(move || read_document(&filename, &data))
                .await
                .map_err(|e| AppError::Internal(e.into()))??
        }
        None => String::new(),
    };
    raw_text.push('\n');
    raw_text.push_str(&state.gateway.fetcher().fetch_text(&url).await);

    let plan = state
        .sessions
        .update(id, |session| {
            session.prepare_discovery(&raw_text, job_title.as_deref())
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    if let DiscoveryInput::Extract(text) = plan {
        info!("Session {id}: extracting from {} chars", text.chars().count());
        let fields = state.gateway.extract(&text, language).await?;
        let record = coerce_and_fill(&Value::Object(fields))?;
        return mutate(&state, id, |session| {
            session.apply_extraction(&record);
            Ok(())
        })
        .await;
    }

    info!("Session {id}: no document text, continuing with manual entry");
    handle_get_session(State(state), Path(id)).await
}

/// POST /api/v1/sessions/:id/company-info
///
/// Scrapes the session's `company.website`; every non-empty fact found
/// overwrites the matching company/location field.
pub async fn handle_session_company_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyInfoResponse>, AppError> {
    let session = load(&state, id).await?;
    let url = session.text(FieldPath::CompanyWebsite).trim().to_string();
    if url.is_empty() {
        return Err(AppError::Validation(
            "company.website must be set before fetching company info".to_string(),
        ));
    }

    let info = state.gateway.company_info(&url, session.language).await?;

    let (updated, view) = state
        .sessions
        .update(id, |session| {
            let updated = session.apply_company_info(&url, &info);
            (updated, SessionView::from(&*session))
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(CompanyInfoResponse {
        info,
        updated,
        session: view,
    }))
}

/// POST /api/v1/sessions/:id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&state, id, |session| session.advance().map(|_| ())).await
}

/// POST /api/v1/sessions/:id/previous
pub async fn handle_previous(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    mutate(&state, id, |session| {
        session.retreat();
        Ok(())
    })
    .await
}

/// GET /api/v1/sessions/:id/followups
///
/// Questions for the current step's empty critical fields; on steps without
/// fields, for every empty critical field.
pub async fn handle_followups(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<FollowupQuestion>>, AppError> {
    let session = load(&state, id).await?;
    let lang = query.lang.unwrap_or(session.language);
    let step_fields = session.step.fields();
    let keys: &[FieldPath] = if step_fields.is_empty() {
        CRITICAL_FIELDS
    } else {
        &step_fields
    };
    Ok(Json(followup_questions(&session.state, keys, lang)))
}

/// GET /api/v1/sessions/:id/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = load(&state, id).await?;
    Ok(Json(session.summary()?))
}

/// POST /api/v1/sessions/:id/job-ad
pub async fn handle_job_ad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<JobAdRequest>>,
) -> Result<Json<GeneratedDocument>, AppError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let session = load(&state, id).await?;
    let record = session.record()?;
    let lang = request.lang.unwrap_or(session.language);

    let content = state
        .gateway
        .job_ad(&record, request.tone, lang, request.model)
        .await?;

    let stored = content.clone();
    state
        .sessions
        .update(id, move |session| session.job_ad = Some(stored))
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(GeneratedDocument { content }))
}

/// POST /api/v1/sessions/:id/interview-guide
pub async fn handle_interview_guide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<InterviewGuideRequest>>,
) -> Result<Json<GeneratedDocument>, AppError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let session = load(&state, id).await?;
    let record = session.record()?;
    let lang = request.lang.unwrap_or(session.language);

    let content = state
        .gateway
        .interview_guide(&record, lang, request.model)
        .await?;

    let stored = content.clone();
    state
        .sessions
        .update(id, move |session| session.interview_guide = Some(stored))
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(GeneratedDocument { content }))
}
