//! Paste record, creation input, and the read models handed to callers.

use super::expiration::{is_expired, ExpirationSelector};
use super::language::canonicalize;
use crate::constants::{DEFAULT_TITLE, PASTE_ID_LEN, PLAIN_TEXT_LANGUAGE};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A stored paste. Field names match the persisted JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paste {
    pub id: String,
    #[serde(default = "default_title", alias = "name")]
    pub title: String,
    pub content: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Milliseconds since the epoch; immutable after creation.
    #[serde(alias = "createdAt")]
    pub created: i64,
    #[serde(default, alias = "expiresAt")]
    pub expires: Option<i64>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub burn_after_reading: bool,
    #[serde(default)]
    pub views: u64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_language() -> String {
    PLAIN_TEXT_LANGUAGE.to_string()
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasteRequest {
    pub title: Option<String>,
    pub content: String,
    pub language: Option<String>,
    /// Expiration selector string (`never`, `10m`, `1h`, `1d`, `1w`, `1m`, `burn`).
    pub expiration: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub burn_after_reading: bool,
}

/// Filters applied by the recent-pastes listing. Each flag is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentFilter {
    pub exclude_protected: bool,
    pub exclude_burn: bool,
}

impl Default for RecentFilter {
    fn default() -> Self {
        Self {
            exclude_protected: true,
            exclude_burn: true,
        }
    }
}

/// A paste as shown to readers: everything except the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub language: String,
    pub created: i64,
    pub expires: Option<i64>,
    pub burn_after_reading: bool,
    pub views: u64,
    pub has_password: bool,
}

/// Listing row without content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteSummary {
    pub id: String,
    pub title: String,
    pub language: String,
    pub created: i64,
    pub expires: Option<i64>,
    pub burn_after_reading: bool,
    pub has_password: bool,
    pub views: u64,
    pub content_len: usize,
}

/// Pre-populated creation form produced by forking an existing paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkDraft {
    pub source_id: String,
    pub title: String,
    pub content: String,
    pub language: String,
}

/// Outcome of merging an exported document into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Generate a random alphanumeric paste id.
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASTE_ID_LEN)
        .map(char::from)
        .collect()
}

/// Trim `title`, falling back to the default placeholder when empty.
pub fn normalize_title(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => default_title(),
    }
}

/// Trim `password`, treating an empty value as no password.
pub fn normalize_password(password: Option<&str>) -> Option<String> {
    password
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl Paste {
    /// Build a paste from a creation request at `now_millis`.
    ///
    /// The id is left empty; the store assigns one inside its transaction.
    ///
    /// # Returns
    /// The new paste, or `None` when the content is blank.
    pub fn from_request(
        req: CreatePasteRequest,
        now_millis: i64,
        expires: Option<i64>,
    ) -> Option<Self> {
        if req.content.trim().is_empty() {
            return None;
        }
        let selector_burns = req
            .expiration
            .as_deref()
            .and_then(ExpirationSelector::parse)
            .is_some_and(ExpirationSelector::is_burn);

        Some(Self {
            id: String::new(),
            title: normalize_title(req.title.as_deref()),
            language: canonicalize(req.language.as_deref().unwrap_or_default()),
            created: now_millis,
            expires,
            password: normalize_password(req.password.as_deref()),
            burn_after_reading: req.burn_after_reading || selector_burns,
            views: 0,
            content: req.content,
        })
    }

    /// Whether this paste is past its expiry at `now_millis`.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        is_expired(self.expires, now_millis)
    }

    /// Whether reading this paste requires a password.
    pub fn is_protected(&self) -> bool {
        self.password.is_some()
    }

    /// Exact comparison of `candidate` against the stored password.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_deref() == Some(candidate)
    }

    /// Build a fork draft sourced from this paste.
    pub fn fork_draft(&self) -> ForkDraft {
        ForkDraft {
            source_id: self.id.clone(),
            title: format!("Fork of {}", self.title),
            content: self.content.clone(),
            language: self.language.clone(),
        }
    }
}

impl From<&Paste> for PasteView {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
            content: value.content.clone(),
            language: value.language.clone(),
            created: value.created,
            expires: value.expires,
            burn_after_reading: value.burn_after_reading,
            views: value.views,
            has_password: value.is_protected(),
        }
    }
}

impl From<Paste> for PasteView {
    fn from(value: Paste) -> Self {
        let has_password = value.is_protected();
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            language: value.language,
            created: value.created,
            expires: value.expires,
            burn_after_reading: value.burn_after_reading,
            views: value.views,
            has_password,
        }
    }
}

impl From<&Paste> for PasteSummary {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
            language: value.language.clone(),
            created: value.created,
            expires: value.expires,
            burn_after_reading: value.burn_after_reading,
            has_password: value.is_protected(),
            views: value.views,
            content_len: value.content.len(),
        }
    }
}
