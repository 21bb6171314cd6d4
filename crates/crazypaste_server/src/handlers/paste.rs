//! Paste HTTP handlers.

use crate::{error::HttpError, models::paste::*, AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use crazypaste_core::{DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT};
use serde::{Deserialize, Serialize};

/// Optional password supplied by a reader.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordQuery {
    pub password: Option<String>,
}

impl PasswordQuery {
    fn candidate(&self) -> Option<&str> {
        self.password.as_deref().filter(|value| !value.is_empty())
    }
}

/// Query parameters for the recent listing. Absent filters use configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
    pub exclude_burn: Option<bool>,
    pub exclude_protected: Option<bool>,
}

/// Body of a password check.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub password: String,
}

/// Result of a password check.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

fn normalized_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_RECENT_LIMIT).min(MAX_RECENT_LIMIT)
}

fn open_paste(state: &AppState, id: &str, query: &PasswordQuery) -> Result<Paste, HttpError> {
    state
        .db
        .pastes
        .open(id, query.candidate())?
        .ok_or_else(|| AppError::NotFound.into())
}

/// Create a new paste.
///
/// # Returns
/// The stored paste without its password.
///
/// # Errors
/// 400 for empty or oversized content; storage errors otherwise.
pub async fn create_paste(
    State(state): State<AppState>,
    Json(req): Json<CreatePasteRequest>,
) -> Result<Json<PasteView>, HttpError> {
    if req.content.len() > state.config.max_paste_size {
        return Err(AppError::BadRequest(format!(
            "Paste size exceeds maximum of {} bytes",
            state.config.max_paste_size
        ))
        .into());
    }
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest("Paste content cannot be empty".to_string()).into());
    }

    let paste = state.db.pastes.create(req)?;
    Ok(Json(PasteView::from(paste)))
}

/// Fetch a paste for viewing.
///
/// Counts as a read: expired pastes are removed and burn pastes are consumed.
///
/// # Errors
/// 404 when missing, 401/403 for protected pastes without the right password.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> Result<Json<PasteView>, HttpError> {
    open_paste(&state, &id, &query).map(|paste| Json(PasteView::from(paste)))
}

/// Fetch only the paste content as plain text.
///
/// # Errors
/// Same as [`get_paste`].
pub async fn get_raw_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let paste = open_paste(&state, &id, &query)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        paste.content,
    ))
}

/// Check a password without reading the paste.
///
/// # Errors
/// Storage errors only; missing pastes report `valid: false`.
pub async fn verify_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, HttpError> {
    let valid = state.db.pastes.verify_password(&id, &req.password)?;
    Ok(Json(VerifyResponse { valid }))
}

/// Build a creation draft from an existing paste.
///
/// # Errors
/// Same as [`get_paste`].
pub async fn fork_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> Result<Json<ForkDraft>, HttpError> {
    state
        .db
        .pastes
        .fork(&id, query.candidate())?
        .map(Json)
        .ok_or_else(|| AppError::NotFound.into())
}

/// Delete a paste by id.
///
/// # Errors
/// 404 when nothing was deleted.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, HttpError> {
    if state.db.pastes.delete(&id)? {
        tracing::info!("Deleted paste {}", id);
        Ok(Json(serde_json::json!({ "success": true })))
    } else {
        Err(AppError::NotFound.into())
    }
}

/// List every live paste as summary rows.
///
/// # Errors
/// Storage errors only.
pub async fn list_pastes(
    State(state): State<AppState>,
) -> Result<Json<Vec<PasteSummary>>, HttpError> {
    let pastes = state.db.pastes.get_all()?;
    Ok(Json(pastes.iter().map(PasteSummary::from).collect()))
}

/// Most recent pastes, newest first.
///
/// # Errors
/// Storage errors only.
pub async fn recent_pastes(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<PasteSummary>>, HttpError> {
    let defaults = state.config.recent_filter();
    let filter = RecentFilter {
        exclude_protected: query.exclude_protected.unwrap_or(defaults.exclude_protected),
        exclude_burn: query.exclude_burn.unwrap_or(defaults.exclude_burn),
    };
    let pastes = state
        .db
        .pastes
        .get_recent(normalized_limit(query.limit), filter)?;
    Ok(Json(pastes.iter().map(PasteSummary::from).collect()))
}
