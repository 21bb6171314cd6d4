//! Static metadata endpoints.

use crate::models::language::{LanguageOption, LANGUAGE_OPTIONS};
use axum::Json;

/// List the languages offered by paste pickers.
pub async fn list_languages() -> Json<&'static [LanguageOption]> {
    Json(LANGUAGE_OPTIONS)
}
