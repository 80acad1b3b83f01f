//! Persistent record of past generations and their estimates
//!
//! The on-disk format is a pretty-printed JSON array of `HistoryEntry`, newest
//! first. Export and import are lossless: estimates keep every float bit.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{CostEstimate, UsageReport, estimate};
use crate::error::AppError;
use crate::pricing::{Catalog, Provider};
use crate::provider::{Attachment, GenerationRequest, ProviderResponse};
use crate::thinking::ThinkingConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    pub(crate) usage: UsageReport,
    pub(crate) estimate: CostEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryEntry {
    pub(crate) id: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) provider: Provider,
    pub(crate) model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    pub(crate) prompt: String,
    #[serde(default)]
    pub(crate) attachments: Vec<Attachment>,
    #[serde(default)]
    pub(crate) thinking: ThinkingConfig,
    pub(crate) result: GenerationResult,
}

impl HistoryEntry {
    pub(crate) fn new(
        provider: Provider,
        request: GenerationRequest,
        response: ProviderResponse,
        estimate: CostEstimate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            provider,
            model: request.model,
            title: request.title,
            prompt: request.prompt,
            attachments: request.attachments,
            thinking: request.thinking,
            result: GenerationResult {
                text: response.text,
                usage: response.usage,
                estimate,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum LoadMode {
    /// Loaded entries go before the existing ones
    #[default]
    Append,
    /// Loaded entries replace the existing ones
    Replace,
}

/// Outcome of re-pricing a history against a catalog
#[derive(Debug, Default, PartialEq)]
pub(crate) struct RepriceReport {
    pub(crate) repriced: usize,
    pub(crate) changed: usize,
    /// (entry id, model) pairs whose model has no price; estimates kept
    pub(crate) unpriced: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub(crate) fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Newest first
    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub(crate) fn merge(&mut self, loaded: Vec<HistoryEntry>, mode: LoadMode) {
        match mode {
            LoadMode::Append => {
                let existing = std::mem::replace(&mut self.entries, loaded);
                self.entries.extend(existing);
            }
            LoadMode::Replace => self.entries = loaded,
        }
    }

    /// Look up by full id or unique id prefix
    pub(crate) fn find(&self, id: &str) -> Result<&HistoryEntry, AppError> {
        if id.is_empty() {
            return Err(AppError::EntryNotFound { id: String::new() });
        }
        if let Some(entry) = self.entries.iter().find(|e| e.id == id) {
            return Ok(entry);
        }
        let mut matches = self.entries.iter().filter(|e| e.id.starts_with(id));
        match (matches.next(), matches.count()) {
            (Some(entry), 0) => Ok(entry),
            (None, _) => Err(AppError::EntryNotFound { id: id.to_string() }),
            (Some(_), rest) => Err(AppError::AmbiguousEntry {
                id: id.to_string(),
                matches: rest + 1,
            }),
        }
    }

    /// Recompute every estimate from its stored usage
    pub(crate) fn reprice(&mut self, catalog: &Catalog) -> RepriceReport {
        let outcomes: Vec<Result<bool, (String, String)>> = self
            .entries
            .par_iter_mut()
            .map(|entry| match estimate(catalog, &entry.model, &entry.result.usage) {
                Ok(fresh) => {
                    let changed = fresh != entry.result.estimate;
                    entry.result.estimate = fresh;
                    Ok(changed)
                }
                Err(_) => Err((entry.id.clone(), entry.model.clone())),
            })
            .collect();

        let mut report = RepriceReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(changed) => {
                    report.repriced += 1;
                    if changed {
                        report.changed += 1;
                    }
                }
                Err(unpriced) => report.unpriced.push(unpriced),
            }
        }
        report
    }

    pub(crate) fn total_cost(&self) -> f64 {
        self.entries.iter().map(|e| e.result.estimate.total_cost).sum()
    }

    /// Missing file is an empty history
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_entries(import_json(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(AppError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = export_json(&self.entries)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| AppError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn export_json(entries: &[HistoryEntry]) -> Result<String, AppError> {
    serde_json::to_string_pretty(entries).map_err(AppError::Encode)
}

/// Parse an exported history; the document must be a JSON array
pub(crate) fn import_json(text: &str) -> Result<Vec<HistoryEntry>, AppError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(AppError::HistoryParse)?;
    if !value.is_array() {
        return Err(AppError::InvalidHistoryFormat);
    }
    serde_json::from_value(value).map_err(AppError::HistoryParse)
}

pub(crate) fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("mmcost").join("history.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, model: &str, prompt_tokens: u64) -> HistoryEntry {
        let usage = UsageReport {
            prompt_token_count: Some(prompt_tokens),
            candidates_token_count: Some(333),
            thoughts_token_count: Some(77),
            ..Default::default()
        };
        let catalog = Catalog::builtin();
        let estimate = estimate(&catalog, "gemini-2.5-flash", &usage).unwrap();
        HistoryEntry {
            id: id.to_string(),
            timestamp: Utc::now(),
            provider: Provider::Google,
            model: model.to_string(),
            title: Some(format!("title {id}")),
            prompt: "describe this".to_string(),
            attachments: vec![Attachment {
                name: "a.txt".to_string(),
                mime_type: "text/plain".to_string(),
                data: "aGk=".to_string(),
            }],
            thinking: ThinkingConfig::Budget { budget: 1024 },
            result: GenerationResult {
                text: Some("ok".to_string()),
                usage,
                estimate,
            },
        }
    }

    fn ids(history: &History) -> Vec<&str> {
        history.entries().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn record_puts_newest_first() {
        let mut history = History::default();
        history.record(entry("a", "gemini-2.5-flash", 10));
        history.record(entry("b", "gemini-2.5-flash", 10));
        assert_eq!(ids(&history), vec!["b", "a"]);
    }

    #[test]
    fn merge_append_puts_loaded_first() {
        let mut history = History::from_entries(vec![entry("old", "gemini-2.5-flash", 1)]);
        history.merge(
            vec![entry("new1", "gemini-2.5-flash", 1), entry("new2", "gemini-2.5-flash", 1)],
            LoadMode::Append,
        );
        assert_eq!(ids(&history), vec!["new1", "new2", "old"]);
    }

    #[test]
    fn merge_replace_discards_existing() {
        let mut history = History::from_entries(vec![entry("old", "gemini-2.5-flash", 1)]);
        history.merge(vec![entry("new", "gemini-2.5-flash", 1)], LoadMode::Replace);
        assert_eq!(ids(&history), vec!["new"]);
    }

    #[test]
    fn export_import_round_trip_is_lossless() {
        let entries = vec![
            entry("a", "gemini-2.5-flash", 123_457),
            entry("b", "gemini-2.5-flash", 9),
        ];
        let json = export_json(&entries).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn import_rejects_non_array() {
        let err = import_json(r#"{"id":"x"}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidHistoryFormat));
    }

    #[test]
    fn import_reports_malformed_json() {
        assert!(matches!(
            import_json("[{").unwrap_err(),
            AppError::HistoryParse(_)
        ));
        assert!(matches!(
            import_json(r#"[{"id":1}]"#).unwrap_err(),
            AppError::HistoryParse(_)
        ));
    }

    #[test]
    fn find_by_prefix() {
        let history = History::from_entries(vec![
            entry("abc123", "gemini-2.5-flash", 1),
            entry("abd456", "gemini-2.5-flash", 1),
        ]);
        assert_eq!(history.find("abc").unwrap().id, "abc123");
        assert_eq!(history.find("abd456").unwrap().id, "abd456");
        assert!(matches!(
            history.find("ab").unwrap_err(),
            AppError::AmbiguousEntry { matches: 2, .. }
        ));
        assert!(matches!(
            history.find("zz").unwrap_err(),
            AppError::EntryNotFound { .. }
        ));
    }

    #[test]
    fn reprice_updates_and_reports_unpriced() {
        let mut stale = entry("a", "gemini-2.5-pro", 1_000);
        stale.result.estimate.total_cost = 999.0;
        let gone = entry("b", "retired-model", 1_000);
        let kept_estimate = gone.result.estimate.clone();
        let mut history = History::from_entries(vec![stale, gone]);

        let report = history.reprice(&Catalog::builtin());
        assert_eq!(report.repriced, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(
            report.unpriced,
            vec![("b".to_string(), "retired-model".to_string())]
        );
        let fresh = &history.entries()[0].result.estimate;
        assert_eq!(fresh.total_cost, fresh.input_cost + fresh.output_cost);
        assert_eq!(history.entries()[1].result.estimate, kept_estimate);
    }

    #[test]
    fn load_missing_file_is_empty_and_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let mut history = History::load(&path).unwrap();
        assert_eq!(history.len(), 0);

        history.record(entry("a", "gemini-2.5-flash", 42));
        history.save(&path).unwrap();
        let loaded = History::load(&path).unwrap();
        assert_eq!(loaded, history);
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn entry_new_assigns_uuid() {
        let request = GenerationRequest {
            model: "gemini-2.5-flash".to_string(),
            prompt: "p".to_string(),
            title: None,
            attachments: Vec::new(),
            thinking: ThinkingConfig::None,
        };
        let response = ProviderResponse::default();
        let estimate = estimate(&Catalog::builtin(), "gemini-2.5-flash", &response.usage).unwrap();
        let e = HistoryEntry::new(Provider::Google, request, response, estimate);
        assert!(uuid::Uuid::parse_str(&e.id).is_ok());
        assert_eq!(e.model, "gemini-2.5-flash");
    }
}
