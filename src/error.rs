use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Pricing info for model {model} not found.")]
    PricingNotFound { model: String },

    #[error("Invalid catalog entry \"{model}\": {reason}")]
    InvalidCatalog { model: String, reason: String },

    #[error("Failed to parse catalog {path}: {message}")]
    CatalogParse { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid usage report {path}: {source}")]
    UsageParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid pattern \"{pattern}\": {message}")]
    Pattern { pattern: String, message: String },

    #[error("No usage reports matched \"{pattern}\"")]
    NoMatches { pattern: String },

    #[error("Invalid history file format (expected a JSON array of entries)")]
    InvalidHistoryFormat,

    #[error("Failed to parse history file: {0}")]
    HistoryParse(serde_json::Error),

    #[error("No history entry matches \"{id}\"")]
    EntryNotFound { id: String },

    #[error("History id prefix \"{id}\" is ambiguous ({matches} entries)")]
    AmbiguousEntry { id: String, matches: usize },

    #[error("{provider} provider is not available: {reason}")]
    ProviderUnavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("No history file (pass a path or set history in config)")]
    NoHistoryPath,

    #[error("Nothing to run: provide a prompt or at least one attachment")]
    EmptyRequest,

    #[error("No model selected (pass --model or set default_model in config)")]
    NoModel,

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Failed to encode JSON: {0}")]
    Encode(serde_json::Error),

    #[error("{0}")]
    Jq(#[from] JqError),
}

#[derive(Debug, Error)]
pub(crate) enum JqError {
    #[error("jq not found. Please install jq to use --jq option.")]
    NotFound,

    #[error("Failed to run jq: {0}")]
    Spawn(std::io::Error),

    #[error("Failed to write to jq stdin: {0}")]
    Stdin(std::io::Error),

    #[error("Failed to wait for jq: {0}")]
    Wait(std::io::Error),

    #[error("Invalid UTF-8 from jq: {0}")]
    Utf8(std::string::FromUtf8Error),

    #[error("jq error: {0}")]
    Filter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_pricing_not_found() {
        let e = AppError::PricingNotFound {
            model: "gemini-9".to_string(),
        };
        assert_eq!(e.to_string(), "Pricing info for model gemini-9 not found.");
    }

    #[test]
    fn app_error_display_invalid_catalog() {
        let e = AppError::InvalidCatalog {
            model: "m".to_string(),
            reason: "high tier requires a breakpoint".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid catalog entry "m": high tier requires a breakpoint"#
        );
    }

    #[test]
    fn app_error_display_history_format() {
        assert_eq!(
            AppError::InvalidHistoryFormat.to_string(),
            "Invalid history file format (expected a JSON array of entries)"
        );
    }

    #[test]
    fn app_error_display_ambiguous() {
        let e = AppError::AmbiguousEntry {
            id: "ab".to_string(),
            matches: 3,
        };
        assert_eq!(
            e.to_string(),
            r#"History id prefix "ab" is ambiguous (3 entries)"#
        );
    }

    #[test]
    fn app_error_display_locale() {
        let e = AppError::UnsupportedLocale {
            input: "xx".to_string(),
        };
        assert_eq!(e.to_string(), "Unsupported locale: xx");
    }

    #[test]
    fn jq_error_not_found() {
        assert_eq!(
            JqError::NotFound.to_string(),
            "jq not found. Please install jq to use --jq option."
        );
    }

    #[test]
    fn jq_error_wraps_into_app_error() {
        let e: AppError = JqError::Filter("bad filter".to_string()).into();
        assert_eq!(e.to_string(), "jq error: bad filter");
    }
}
