use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::extraction::company::CompanyInfo;
use crate::language::Language;
use crate::questions::list_missing_critical;
use crate::schema::json_schema::canonical_json_schema;
use crate::schema::{
    coerce_and_fill, flatten, FieldKind, FieldPath, FlatRecord, Step, VacancyDescription,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SchemaQuery {
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct FieldDescriptor {
    pub path: FieldPath,
    pub kind: FieldKind,
    pub step: Step,
    pub critical: bool,
}

#[derive(Debug, Serialize)]
pub struct StepDescriptor {
    pub step: Step,
    pub index: usize,
    pub title: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub json_schema: Value,
    pub fields: Vec<FieldDescriptor>,
    pub steps: Vec<StepDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub record: VacancyDescription,
    pub flat: FlatRecord,
    pub missing_critical: Vec<FieldPath>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyInfoRequest {
    pub url: String,
    pub lang: Option<Language>,
}

/// GET /api/v1/schema
pub async fn handle_schema(
    State(state): State<AppState>,
    Query(query): Query<SchemaQuery>,
) -> Json<SchemaResponse> {
    let lang = query.lang.unwrap_or(state.config.default_language);
    let fields = FieldPath::ALL
        .iter()
        .map(|&path| FieldDescriptor {
            path,
            kind: path.kind(),
            step: path.step(),
            critical: path.is_critical(),
        })
        .collect();
    let steps = Step::ALL
        .iter()
        .map(|&step| StepDescriptor {
            step,
            index: step.index(),
            title: step.title(lang),
        })
        .collect();

    Json(SchemaResponse {
        json_schema: canonical_json_schema(),
        fields,
        steps,
    })
}

/// POST /api/v1/extract
///
/// Runs the extraction chain over free text and returns the coerced,
/// fully defaulted record.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let lang = request.lang.unwrap_or(state.config.default_language);

    let fields = state.gateway.extract(&request.text, lang).await?;
    let record = coerce_and_fill(&Value::Object(fields))?;
    let flat = flatten(&record);
    let missing_critical = list_missing_critical(&flat);

    Ok(Json(ExtractResponse {
        record,
        flat,
        missing_critical,
    }))
}

/// POST /api/v1/company-info
pub async fn handle_company_info(
    State(state): State<AppState>,
    Json(request): Json<CompanyInfoRequest>,
) -> Result<Json<CompanyInfo>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }
    let lang = request.lang.unwrap_or(state.config.default_language);
    let info = state.gateway.company_info(request.url.trim(), lang).await?;
    Ok(Json(info))
}
