use serde::{Deserialize, Serialize};

use crate::core::Modality;
use crate::error::AppError;

/// Vendor a catalog entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum Provider {
    Google,
    Openai,
    Anthropic,
}

impl Provider {
    pub(crate) fn display_name(self) -> &'static str {
        match self {
            Provider::Google => "Google Gemini",
            Provider::Openai => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }
}

/// Billing denomination for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum OutputUnit {
    #[default]
    Tokens,
    Seconds,
    Count,
}

impl OutputUnit {
    pub(crate) fn label(self) -> &'static str {
        match self {
            OutputUnit::Tokens => "tokens",
            OutputUnit::Seconds => "seconds",
            OutputUnit::Count => "items",
        }
    }

    /// Rate suffix used when displaying a price in this unit
    pub(crate) fn rate_suffix(self) -> &'static str {
        match self {
            OutputUnit::Tokens => "/1M",
            OutputUnit::Seconds => "/sec",
            OutputUnit::Count => "/item",
        }
    }
}

/// Input rates per million units, keyed by modality
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct InputRates {
    #[serde(rename = "TEXT", default)]
    pub(crate) text: f64,
    #[serde(rename = "AUDIO", default, skip_serializing_if = "Option::is_none")]
    pub(crate) audio: Option<f64>,
    #[serde(rename = "VIDEO", default, skip_serializing_if = "Option::is_none")]
    pub(crate) video: Option<f64>,
    #[serde(rename = "IMAGE", default, skip_serializing_if = "Option::is_none")]
    pub(crate) image: Option<f64>,
}

impl InputRates {
    /// Rate for a modality; anything without its own rate is billed as text
    pub(crate) fn rate_for(&self, modality: &Modality) -> f64 {
        let specific = match modality {
            Modality::Text => None,
            Modality::Audio => self.audio,
            Modality::Video => self.video,
            Modality::Image => self.image,
            Modality::Other(_) => None,
        };
        specific.unwrap_or(self.text)
    }

    fn all(&self) -> impl Iterator<Item = f64> {
        [Some(self.text), self.audio, self.video, self.image]
            .into_iter()
            .flatten()
    }
}

/// One pricing tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateTable {
    #[serde(default)]
    pub(crate) input: InputRates,
    #[serde(default)]
    pub(crate) output: f64,
    #[serde(default)]
    pub(crate) output_unit: OutputUnit,
    /// Native-audio output billed apart from text/thinking output (per 1M tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) audio_output: Option<f64>,
}

impl RateTable {
    fn validate(&self, model: &str, tier: &str) -> Result<(), AppError> {
        let rates = self
            .input
            .all()
            .chain([self.output])
            .chain(self.audio_output);
        for rate in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(AppError::InvalidCatalog {
                    model: model.to_string(),
                    reason: format!("{tier} tier has an invalid rate ({rate})"),
                });
            }
        }
        Ok(())
    }
}

/// How generated images are billed. A model uses exactly one policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ImageOutputPricing {
    /// Image tokens are ordinary output tokens
    #[default]
    OutputTokens,
    /// Image tokens billed at a dedicated per-million rate
    TokenRate {
        rate: f64,
        /// Tokens assumed per image when the report has no image token split
        #[serde(
            rename = "placeholderTokensPerImage",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        placeholder_tokens_per_image: Option<u64>,
    },
    /// Flat price per generated image; image tokens are not billed
    FixedPerImage { price: f64 },
}

/// Catalog entry for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricingEntry {
    pub(crate) id: String,
    pub(crate) provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    pub(crate) standard: RateTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) high: Option<RateTable>,
    /// Input units above which `high` applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) breakpoint: Option<u64>,
    #[serde(default)]
    pub(crate) image_output: ImageOutputPricing,
    #[serde(default)]
    pub(crate) supports_thinking: bool,
}

impl PricingEntry {
    pub(crate) fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Pro-class models get the larger HIGH thinking budget
    pub(crate) fn is_pro_class(&self) -> bool {
        self.id.contains("pro")
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.id.trim().is_empty() {
            return Err(AppError::InvalidCatalog {
                model: self.id.clone(),
                reason: "model id is empty".to_string(),
            });
        }
        if self.high.is_some() && self.breakpoint.is_none() {
            return Err(AppError::InvalidCatalog {
                model: self.id.clone(),
                reason: "high tier requires a breakpoint".to_string(),
            });
        }
        self.standard.validate(&self.id, "standard")?;
        if let Some(high) = &self.high {
            high.validate(&self.id, "high")?;
        }
        let policy_rate = match self.image_output {
            ImageOutputPricing::OutputTokens => None,
            ImageOutputPricing::TokenRate { rate, .. } => Some(rate),
            ImageOutputPricing::FixedPerImage { price } => Some(price),
        };
        if let Some(rate) = policy_rate
            && (!rate.is_finite() || rate < 0.0)
        {
            return Err(AppError::InvalidCatalog {
                model: self.id.clone(),
                reason: format!("image output policy has an invalid rate ({rate})"),
            });
        }
        Ok(())
    }
}
