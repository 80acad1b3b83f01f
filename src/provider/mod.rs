//! Provider abstraction layer
//!
//! A provider turns a generation request into a usage report. The estimator
//! never talks to a vendor directly; it only sees `ProviderResponse`.

mod recorded;

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::core::UsageReport;
use crate::error::AppError;
use crate::pricing::Provider;
use crate::thinking::ThinkingConfig;

pub(crate) use recorded::{RecordedProvider, read_recording};

/// File attached to a prompt, stored inline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Attachment {
    pub(crate) name: String,
    pub(crate) mime_type: String,
    /// Base64 payload
    pub(crate) data: String,
}

impl Attachment {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let bytes = std::fs::read(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            mime_type: guess_mime(path).to_string(),
            name,
            data: STANDARD.encode(bytes),
        })
    }

    /// Decoded payload size in bytes
    pub(crate) fn size(&self) -> usize {
        STANDARD.decode(&self.data).map(|b| b.len()).unwrap_or(0)
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Everything needed to issue one generation call
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenerationRequest {
    pub(crate) model: String,
    pub(crate) prompt: String,
    pub(crate) title: Option<String>,
    pub(crate) attachments: Vec<Attachment>,
    pub(crate) thinking: ThinkingConfig,
}

impl GenerationRequest {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.prompt.trim().is_empty() && self.attachments.is_empty() {
            return Err(AppError::EmptyRequest);
        }
        Ok(())
    }
}

/// Result of a provider call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProviderResponse {
    /// Model that served the call, when the recording names one
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "modelVersion")]
    pub(crate) model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    #[serde(alias = "usageMetadata")]
    pub(crate) usage: UsageReport,
}

pub(crate) trait UsageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch_usage(
        &self,
        request: &GenerationRequest,
        thinking_budget: Option<u32>,
    ) -> Result<ProviderResponse, AppError>;
}

/// Vendors without a live integration
struct UnavailableProvider {
    provider: Provider,
}

impl UsageProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        self.provider.display_name()
    }

    fn fetch_usage(
        &self,
        _request: &GenerationRequest,
        _thinking_budget: Option<u32>,
    ) -> Result<ProviderResponse, AppError> {
        let reason = match self.provider {
            Provider::Google => "live calls are not supported; pass --replay with a recorded response",
            Provider::Openai | Provider::Anthropic => "integration not implemented",
        };
        Err(AppError::ProviderUnavailable {
            provider: self.name(),
            reason: reason.to_string(),
        })
    }
}

/// Provider for a catalog vendor; a recording replaces any live vendor
pub(crate) fn provider_for(provider: Provider, replay: Option<PathBuf>) -> Box<dyn UsageProvider> {
    match replay {
        Some(path) => Box::new(RecordedProvider::new(path)),
        None => Box::new(UnavailableProvider { provider }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-2.5-flash".to_string(),
            prompt: prompt.to_string(),
            title: None,
            attachments: Vec::new(),
            thinking: ThinkingConfig::None,
        }
    }

    #[test]
    fn attachment_encodes_file_and_guesses_mime() {
        let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        file.write_all(b"\x89PNG-data").unwrap();
        let att = Attachment::from_path(file.path()).unwrap();
        assert_eq!(att.mime_type, "image/png");
        assert_eq!(att.data, STANDARD.encode(b"\x89PNG-data"));
        assert_eq!(att.size(), 9);
    }

    #[test]
    fn attachment_missing_file_is_read_error() {
        let err = Attachment::from_path(Path::new("/nonexistent/a.png")).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(guess_mime(Path::new("blob.xyz")), "application/octet-stream");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn empty_request_rejected() {
        assert!(matches!(
            request("   ").validate().unwrap_err(),
            AppError::EmptyRequest
        ));
        assert!(request("hi").validate().is_ok());
    }

    #[test]
    fn unavailable_vendors_report_error() {
        for vendor in [Provider::Google, Provider::Openai, Provider::Anthropic] {
            let p = provider_for(vendor, None);
            let err = p.fetch_usage(&request("hi"), None).unwrap_err();
            assert!(matches!(err, AppError::ProviderUnavailable { .. }));
        }
    }

    struct Canned(ProviderResponse);

    impl UsageProvider for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn fetch_usage(
            &self,
            _request: &GenerationRequest,
            _thinking_budget: Option<u32>,
        ) -> Result<ProviderResponse, AppError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn canned_provider_feeds_engine() {
        let provider: Box<dyn UsageProvider> = Box::new(Canned(ProviderResponse {
            usage: UsageReport {
                prompt_token_count: Some(1_000_000),
                candidates_token_count: Some(500_000),
                ..Default::default()
            },
            ..Default::default()
        }));
        let response = provider.fetch_usage(&request("hi"), Some(4096)).unwrap();
        let catalog = crate::pricing::Catalog::builtin();
        let estimate =
            crate::core::estimate(&catalog, "gemini-3-flash-preview", &response.usage).unwrap();
        assert!((estimate.total_cost - 2.0).abs() < 1e-12);
    }
}
