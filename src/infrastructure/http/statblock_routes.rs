//! Statblock API routes

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::dto::{
    RetierRequestDto, RetierResponseDto, SaveResponseDto, SearchRequestDto, SearchResponseDto,
    StatblockSummaryDto, TypesQueryDto, TypesResponseDto,
};
use crate::application::ports::outbound::RepositoryError;
use crate::application::services::{Retiered, StatblockService};
use crate::domain::entities::Statblock;
use crate::domain::services::statblock_from_record;
use crate::domain::value_objects::{StatblockQuery, Tier};
use crate::domain::DomainError;
use crate::infrastructure::export::{render_markdown, ExportFormat, ExternalStatblock};
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// Storage failures are server errors, anything else was the caller's fault
fn service_error(e: anyhow::Error) -> (StatusCode, String) {
    if e.downcast_ref::<RepositoryError>().is_some() {
        tracing::error!("Statblock storage failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    } else {
        (StatusCode::BAD_REQUEST, e.to_string())
    }
}

fn bad_request(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn not_found(name: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Statblock not found: {}", name))
}

impl From<Retiered> for RetierResponseDto {
    fn from(retiered: Retiered) -> Self {
        Self {
            changed: retiered.changed,
            stat: retiered.stat,
        }
    }
}

/// Read a statblock the way pasted records are read: string tiers and
/// comma-joined lists are fine, a missing name is not
fn statblock_from_body(body: Value) -> Result<Statblock, (StatusCode, String)> {
    let Value::Object(record) = body else {
        return Err(bad_request("Statblock must be a JSON object"));
    };
    statblock_from_record(&record).ok_or_else(|| bad_request("Name is required"))
}

/// List the type vocabulary for a category
pub async fn list_types(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TypesQueryDto>,
) -> Json<TypesResponseDto> {
    Json(TypesResponseDto {
        types: state.statblock_service.list_types(&query.category),
    })
}

/// Search the catalogue
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequestDto>,
) -> Result<Json<SearchResponseDto>, (StatusCode, String)> {
    let query = StatblockQuery::try_from(req).map_err(bad_request)?;

    let results = state
        .statblock_service
        .search(&query)
        .await
        .map_err(service_error)?;

    Ok(Json(SearchResponseDto {
        results: results.iter().map(StatblockSummaryDto::from).collect(),
    }))
}

/// What a `/api/stat/...` path asks for. Names may contain `/`, so the
/// action is read off the end of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatPath<'a> {
    Record(&'a str),
    Preview { name: &'a str, tier: &'a str },
    Export(&'a str),
}

impl<'a> StatPath<'a> {
    fn parse(path: &'a str) -> Self {
        if let Some(name) = path.strip_suffix("/export") {
            return StatPath::Export(name);
        }
        match path.rsplit_once("/tier/") {
            Some((name, tier)) if !tier.is_empty() && tier.bytes().all(|b| b.is_ascii_digit()) => {
                StatPath::Preview { name, tier }
            }
            _ => StatPath::Record(path),
        }
    }
}

/// Get, preview or export a stored statblock
pub async fn stat_resource(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, (StatusCode, String)> {
    match StatPath::parse(&path) {
        StatPath::Record(name) => Ok(get_statblock(&state, name).await?.into_response()),
        StatPath::Preview { name, tier } => {
            Ok(preview_retier(&state, name, tier).await?.into_response())
        }
        StatPath::Export(name) => export_statblock(&state, name, &query).await,
    }
}

async fn get_statblock(
    state: &AppState,
    name: &str,
) -> Result<Json<Statblock>, (StatusCode, String)> {
    state
        .statblock_service
        .get(name)
        .await
        .map_err(service_error)?
        .map(Json)
        .ok_or_else(|| not_found(name))
}

/// Save a statblock, overwriting any record with the same name
pub async fn save_statblock(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<SaveResponseDto>, (StatusCode, String)> {
    let stat = statblock_from_body(body)?;

    state
        .statblock_service
        .save(stat)
        .await
        .map_err(service_error)?;

    Ok(Json(SaveResponseDto { saved: true }))
}

/// Extract a statblock from pasted JSON or text; `{}` when nothing was found
pub async fn parse_statblock(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Value>, (StatusCode, String)> {
    match state.statblock_service.parse(&body) {
        Some(stat) => serde_json::to_value(stat)
            .map(Json)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
        None => Ok(Json(json!({}))),
    }
}

/// Rescale a caller-supplied statblock
pub async fn retier_statblock(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RetierRequestDto>,
) -> Result<Json<RetierResponseDto>, (StatusCode, String)> {
    let tier = req.target_tier().map_err(bad_request)?;
    let stat = statblock_from_body(req.stat)?;
    Ok(Json(state.statblock_service.retier(stat, tier).into()))
}

/// Preview a stored statblock at another tier without saving it
async fn preview_retier(
    state: &AppState,
    name: &str,
    tier: &str,
) -> Result<Json<RetierResponseDto>, (StatusCode, String)> {
    let tier = tier
        .parse::<i64>()
        .map_err(|_| DomainError::UnparseableTier(tier.to_string()))
        .and_then(Tier::try_from)
        .map_err(bad_request)?;

    state
        .statblock_service
        .preview_retier(name, tier)
        .await
        .map_err(service_error)?
        .map(|retiered| Json(retiered.into()))
        .ok_or_else(|| not_found(name))
}

/// Export a stored statblock as markdown or external JSON
async fn export_statblock(
    state: &AppState,
    name: &str,
    query: &ExportQuery,
) -> Result<Response, (StatusCode, String)> {
    let format = match query.format.as_deref() {
        Some(format) => format.parse::<ExportFormat>().map_err(bad_request)?,
        None => ExportFormat::default(),
    };

    let stat = state
        .statblock_service
        .get(name)
        .await
        .map_err(service_error)?
        .ok_or_else(|| not_found(name))?;

    let response = match format {
        ExportFormat::Markdown => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            render_markdown(&stat),
        )
            .into_response(),
        ExportFormat::Json => Json(ExternalStatblock::from(&stat)).into_response(),
    };

    Ok(response)
}
