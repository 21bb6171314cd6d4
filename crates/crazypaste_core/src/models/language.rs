//! Language canonicalization and the static table offered to pickers.

use crate::constants::PLAIN_TEXT_LANGUAGE;
use serde::Serialize;

/// Language option metadata for selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn option(label: &'static str, value: &'static str) -> LanguageOption {
    LanguageOption { label, value }
}

/// Known languages. Plain text first, the rest sorted by label.
pub const LANGUAGE_OPTIONS: &[LanguageOption] = &[
    option("Plain Text", PLAIN_TEXT_LANGUAGE),
    option("Bash", "bash"),
    option("C", "c"),
    option("C++", "cpp"),
    option("C#", "csharp"),
    option("CSS", "css"),
    option("Dart", "dart"),
    option("Dockerfile", "dockerfile"),
    option("Go", "go"),
    option("GraphQL", "graphql"),
    option("HTML", "html"),
    option("Java", "java"),
    option("JavaScript", "javascript"),
    option("JSON", "json"),
    option("JSX", "jsx"),
    option("Kotlin", "kotlin"),
    option("Lua", "lua"),
    option("Markdown", "markdown"),
    option("PHP", "php"),
    option("PowerShell", "powershell"),
    option("Python", "python"),
    option("Ruby", "ruby"),
    option("Rust", "rust"),
    option("SCSS", "scss"),
    option("SQL", "sql"),
    option("Swift", "swift"),
    option("TOML", "toml"),
    option("TSX", "tsx"),
    option("TypeScript", "typescript"),
    option("XML", "xml"),
    option("YAML", "yaml"),
];

/// Convert aliases/legacy names to canonical values.
///
/// Unknown names are returned trimmed and lowercased; empty input becomes
/// the plain-text marker.
pub fn canonicalize(language: &str) -> String {
    let lowered = language.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "" | "text" | "plain" | "plain text" | "txt" => PLAIN_TEXT_LANGUAGE,
        "sh" | "shell" | "zsh" => "bash",
        "c++" | "cc" | "cxx" => "cpp",
        "c#" | "cs" => "csharp",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "py" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "kt" => "kotlin",
        "md" => "markdown",
        "yml" => "yaml",
        "golang" => "go",
        "pwsh" | "ps1" => "powershell",
        "html5" | "htm" => "html",
        "docker" => "dockerfile",
        _ => return lowered,
    };
    canonical.to_string()
}

/// Display label for a language value, if it is in the table.
pub fn label_for(value: &str) -> Option<&'static str> {
    let canonical = canonicalize(value);
    LANGUAGE_OPTIONS
        .iter()
        .find(|option| option.value == canonical)
        .map(|option| option.label)
}
