//! Core data types of the estimation engine
//!
//! Everything here is a plain value: estimates carry no references and can be
//! stored in history documents indefinitely.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pricing::OutputUnit;

/// Content category of an input or output part
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub(crate) enum Modality {
    Text,
    Audio,
    Video,
    Image,
    /// Any tag this crate does not price separately (kept verbatim)
    Other(String),
}

impl Modality {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Modality::Text => "TEXT",
            Modality::Audio => "AUDIO",
            Modality::Video => "VIDEO",
            Modality::Image => "IMAGE",
            Modality::Other(tag) => tag,
        }
    }
}

impl From<String> for Modality {
    fn from(tag: String) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "TEXT" => Modality::Text,
            "AUDIO" => Modality::Audio,
            "VIDEO" => Modality::Video,
            "IMAGE" => Modality::Image,
            _ => Modality::Other(tag),
        }
    }
}

impl From<Modality> for String {
    fn from(modality: Modality) -> Self {
        match modality {
            Modality::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input modality's share of the bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModalityLineItem {
    pub(crate) modality: Modality,
    pub(crate) units: u64,
    /// Rate per million units
    pub(crate) unit_rate: f64,
    pub(crate) cost: f64,
}

/// Fallback values used while estimating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum Approximation {
    /// Image tokens were not reported; a fixed count per image was assumed
    PlaceholderImageTokens {
        images: u64,
        #[serde(rename = "tokensPerImage")]
        tokens_per_image: u64,
    },
    /// Video length was not reported; a default duration was assumed
    AssumedVideoDuration {
        videos: u64,
        #[serde(rename = "secondsPerVideo")]
        seconds_per_video: u64,
    },
    /// Image tokens were not split from text output; they stay at the output rate
    UnsplitImageTokens {
        images: u64,
        #[serde(rename = "candidateTokens")]
        candidate_tokens: u64,
    },
}

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approximation::PlaceholderImageTokens {
                images,
                tokens_per_image,
            } => write!(
                f,
                "image tokens not reported; assumed {tokens_per_image} tokens for each of {images} image(s)"
            ),
            Approximation::AssumedVideoDuration {
                videos,
                seconds_per_video,
            } => write!(
                f,
                "video length not reported; assumed {seconds_per_video}s for each of {videos} video(s)"
            ),
            Approximation::UnsplitImageTokens {
                images,
                candidate_tokens,
            } => write!(
                f,
                "image tokens not split from output; {candidate_tokens} candidate tokens billed at the output rate besides {images} image(s)"
            ),
        }
    }
}

/// Itemized estimate for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CostEstimate {
    pub(crate) input_cost: f64,
    pub(crate) output_cost: f64,
    pub(crate) total_cost: f64,
    pub(crate) input_tokens: u64,
    /// Output units in `output_unit` (tokens, seconds, or items)
    pub(crate) output_tokens: u64,
    pub(crate) output_unit: OutputUnit,
    pub(crate) thinking_tokens: u64,
    pub(crate) text_tokens: u64,
    pub(crate) input_breakdown: Vec<ModalityLineItem>,
    pub(crate) output_rate: f64,
    pub(crate) is_high_tier: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) approximations: Vec<Approximation>,
}

impl CostEstimate {
    pub(crate) fn is_approximate(&self) -> bool {
        !self.approximations.is_empty()
    }
}

/// Canonical usage after normalization; every count is present
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NormalizedUsage {
    pub(crate) total_input_units: u64,
    pub(crate) input_units: Vec<(Modality, u64)>,
    pub(crate) text_output_units: u64,
    pub(crate) thinking_output_units: u64,
    pub(crate) audio_output_units: u64,
    /// Image tokens from a per-modality output split; `None` when unreported
    pub(crate) image_output_units: Option<u64>,
    pub(crate) generated_images: u64,
    pub(crate) generated_videos: u64,
    pub(crate) generated_media_count: u64,
    pub(crate) duration_seconds: u64,
    /// Videos whose length was assumed
    pub(crate) videos_without_duration: u64,
}
