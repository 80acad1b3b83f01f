//! Replays provider responses recorded on disk

use std::path::{Path, PathBuf};

use serde::de;

use crate::core::UsageReport;
use crate::error::AppError;

use super::{GenerationRequest, ProviderResponse, UsageProvider};

/// Keys a bare usage report may carry, aliases included
const USAGE_KEYS: &[&str] = &[
    "promptTokenCount",
    "promptTokensDetails",
    "candidatesTokenCount",
    "candidatesTokensDetails",
    "thoughtsTokenCount",
    "thinkingTokenCount",
    "audioCandidatesTokenCount",
    "outputDurationSeconds",
    "generatedMedia",
];

/// Gemini counters that carry no billable information of their own
const IGNORED_USAGE_KEYS: &[&str] = &[
    "totalTokenCount",
    "cachedContentTokenCount",
    "cacheTokensDetails",
    "toolUsePromptTokenCount",
    "toolUsePromptTokensDetails",
    "trafficType",
];

fn parse_recording(value: serde_json::Value) -> Result<ProviderResponse, serde_json::Error> {
    let serde_json::Value::Object(map) = &value else {
        return Err(de::Error::custom("recording must be a JSON object"));
    };
    if map.contains_key("usage") || map.contains_key("usageMetadata") {
        return serde_json::from_value(value);
    }

    if let Some(key) = map
        .keys()
        .find(|k| !USAGE_KEYS.contains(&k.as_str()) && !IGNORED_USAGE_KEYS.contains(&k.as_str()))
    {
        return Err(de::Error::custom(format_args!(
            "unknown field `{key}` in usage report without a `usage` object"
        )));
    }
    if !map.keys().any(|k| USAGE_KEYS.contains(&k.as_str())) {
        return Err(de::Error::custom("recording carries no usage counts"));
    }
    let usage: UsageReport = serde_json::from_value(value)?;
    Ok(ProviderResponse {
        usage,
        ..Default::default()
    })
}

/// Read a recorded response; a bare usage report is accepted too
pub(crate) fn read_recording(path: &Path) -> Result<ProviderResponse, AppError> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content)
        .and_then(parse_recording)
        .map_err(|source| AppError::UsageParse {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) struct RecordedProvider {
    path: PathBuf,
}

impl RecordedProvider {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl UsageProvider for RecordedProvider {
    fn name(&self) -> &'static str {
        "recorded"
    }

    fn fetch_usage(
        &self,
        request: &GenerationRequest,
        thinking_budget: Option<u32>,
    ) -> Result<ProviderResponse, AppError> {
        let response = read_recording(&self.path)?;
        if let Some(recorded) = &response.model
            && recorded != &request.model
        {
            tracing::warn!(
                recorded = %recorded,
                requested = %request.model,
                path = %self.path.display(),
                "recording was made with a different model"
            );
        }
        tracing::debug!(
            path = %self.path.display(),
            thinking_budget,
            attachments = request.attachments.len(),
            "replayed recording"
        );
        Ok(response)
    }
}
