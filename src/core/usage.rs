//! Raw usage report as returned by a provider
//!
//! Shaped after Gemini's `usageMetadata`; every field is optional because
//! providers and model families report different subsets.

use serde::{Deserialize, Serialize};

use super::types::Modality;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModalityTokenCount {
    pub(crate) modality: Modality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) token_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a MIME type; non-media types return `None`
    pub(crate) fn from_mime(mime_type: &str) -> Option<Self> {
        let top = mime_type.split('/').next()?.trim().to_ascii_lowercase();
        match top.as_str() {
            "image" => Some(MediaKind::Image),
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// One generated media item in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneratedMedia {
    /// Inferred from `mime_type` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) kind: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) duration_seconds: Option<u64>,
}

impl GeneratedMedia {
    pub(crate) fn media_kind(&self) -> Option<MediaKind> {
        self.kind.or_else(|| MediaKind::from_mime(&self.mime_type))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) prompt_token_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) prompt_tokens_details: Option<Vec<ModalityTokenCount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) candidates_token_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) candidates_tokens_details: Option<Vec<ModalityTokenCount>>,
    #[serde(
        default,
        alias = "thinkingTokenCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) thoughts_token_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) audio_candidates_token_count: Option<u64>,
    /// Total generated duration when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) output_duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) generated_media: Vec<GeneratedMedia>,
}
