//! Pricing catalog: model id → tiered rate tables
//!
//! The built-in table mirrors published list prices (USD). A catalog file or a
//! remote catalog can replace it at start-up (see `loader`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::AppError;

use super::types::{ImageOutputPricing, InputRates, OutputUnit, PricingEntry, Provider, RateTable};

/// Serialized catalog document (`{"models": [...]}` / `[[models]]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CatalogDocument {
    #[serde(default)]
    pub(crate) models: Vec<PricingEntry>,
}

/// Read-only, validated set of pricing entries in declaration order
#[derive(Debug, Clone)]
pub(crate) struct Catalog {
    entries: Vec<PricingEntry>,
    index: HashMap<String, usize>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub(crate) fn builtin() -> Self {
        Self::index_entries(builtin_entries())
    }

    fn index_entries(entries: Vec<PricingEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Build a catalog, enforcing one entry per id and per-entry invariants
    pub(crate) fn from_entries(entries: Vec<PricingEntry>) -> Result<Self, AppError> {
        let mut seen = HashMap::with_capacity(entries.len());
        for entry in &entries {
            entry.validate()?;
            if seen.insert(entry.id.as_str(), ()).is_some() {
                return Err(AppError::InvalidCatalog {
                    model: entry.id.clone(),
                    reason: "duplicate model id".to_string(),
                });
            }
        }
        Ok(Self::index_entries(entries))
    }

    pub(crate) fn from_document(doc: CatalogDocument) -> Result<Self, AppError> {
        Self::from_entries(doc.models)
    }

    /// Parse a catalog file; `.toml` files are TOML, everything else JSON
    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self, AppError> {
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let doc: CatalogDocument = if is_toml {
            toml::from_str(content).map_err(|e| AppError::CatalogParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(content).map_err(|e| AppError::CatalogParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };
        Self::from_document(doc)
    }

    pub(crate) fn load_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub(crate) fn get(&self, model: &str) -> Result<&PricingEntry, AppError> {
        self.index
            .get(model)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| AppError::PricingNotFound {
                model: model.to_string(),
            })
    }

    pub(crate) fn entries(&self) -> &[PricingEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn rates(text: f64, audio: f64, video: f64, image: f64) -> InputRates {
    InputRates {
        text,
        audio: Some(audio),
        video: Some(video),
        image: Some(image),
    }
}

fn flat(rate: f64) -> InputRates {
    rates(rate, rate, rate, rate)
}

fn tokens(input: InputRates, output: f64) -> RateTable {
    RateTable {
        input,
        output,
        output_unit: OutputUnit::Tokens,
        audio_output: None,
    }
}

/// Media models carry no input charge
fn media(output: f64, output_unit: OutputUnit) -> RateTable {
    RateTable {
        input: flat(0.0),
        output,
        output_unit,
        audio_output: None,
    }
}

struct Seed {
    id: &'static str,
    label: &'static str,
    provider: Provider,
    standard: RateTable,
    high: Option<(u64, RateTable)>,
    image_output: ImageOutputPricing,
    supports_thinking: bool,
}

impl Seed {
    fn google(id: &'static str, label: &'static str, standard: RateTable) -> Self {
        Seed {
            id,
            label,
            provider: Provider::Google,
            standard,
            high: None,
            image_output: ImageOutputPricing::OutputTokens,
            supports_thinking: false,
        }
    }

    fn thinking(mut self) -> Self {
        self.supports_thinking = true;
        self
    }

    fn tiered(mut self, breakpoint: u64, high: RateTable) -> Self {
        self.high = Some((breakpoint, high));
        self
    }

    fn images(mut self, policy: ImageOutputPricing) -> Self {
        self.image_output = policy;
        self
    }

    fn into_entry(self) -> PricingEntry {
        let (breakpoint, high) = match self.high {
            Some((b, h)) => (Some(b), Some(h)),
            None => (None, None),
        };
        PricingEntry {
            id: self.id.to_string(),
            provider: self.provider,
            label: Some(self.label.to_string()),
            standard: self.standard,
            high,
            breakpoint,
            image_output: self.image_output,
            supports_thinking: self.supports_thinking,
        }
    }
}

fn builtin_entries() -> Vec<PricingEntry> {
    let native_audio = RateTable {
        audio_output: Some(12.00),
        ..tokens(rates(0.50, 3.00, 3.00, 0.50), 2.00)
    };

    let seeds = vec![
        // Gemini 3
        Seed::google(
            "gemini-3-flash-preview",
            "Gemini 3 Flash (Preview)",
            tokens(rates(0.50, 1.00, 0.50, 0.50), 3.00),
        )
        .thinking(),
        Seed::google(
            "gemini-3-pro-preview",
            "Gemini 3 Pro (Preview)",
            tokens(flat(2.00), 12.00),
        )
        .tiered(200_000, tokens(flat(4.00), 18.00))
        .thinking(),
        Seed::google(
            "gemini-3-pro-image-preview",
            "Gemini 3 Pro Image (Preview)",
            tokens(flat(2.00), 12.00),
        )
        .images(ImageOutputPricing::TokenRate {
            rate: 120.00,
            placeholder_tokens_per_image: Some(1120),
        })
        .thinking(),
        // Gemini 2.5
        Seed::google("gemini-2.5-pro", "Gemini 2.5 Pro", tokens(flat(1.25), 10.00))
            .tiered(200_000, tokens(flat(2.50), 15.00))
            .thinking(),
        Seed::google(
            "gemini-2.5-flash",
            "Gemini 2.5 Flash",
            tokens(rates(0.30, 1.00, 0.30, 0.30), 2.50),
        )
        .thinking(),
        Seed::google(
            "gemini-2.5-flash-lite",
            "Gemini 2.5 Flash Lite",
            tokens(rates(0.10, 0.30, 0.10, 0.10), 0.40),
        )
        .thinking(),
        Seed::google(
            "gemini-2.5-flash-image",
            "Gemini 2.5 Flash Image",
            tokens(rates(0.30, 1.00, 0.30, 0.30), 0.30),
        )
        .images(ImageOutputPricing::FixedPerImage { price: 0.039 })
        .thinking(),
        Seed::google(
            "gemini-2.5-flash-native-audio-preview-12-2025",
            "Gemini 2.5 Flash Native Audio (Live)",
            native_audio,
        )
        .thinking(),
        Seed::google(
            "gemini-2.5-flash-preview-tts",
            "Gemini 2.5 Flash TTS",
            tokens(rates(0.50, 1.00, 0.50, 0.50), 10.00),
        )
        .thinking(),
        Seed::google(
            "gemini-2.5-pro-preview-tts",
            "Gemini 2.5 Pro TTS",
            tokens(flat(1.00), 20.00),
        )
        .thinking(),
        // Gemini 2.0
        Seed::google(
            "gemini-2.0-flash",
            "Gemini 2.0 Flash",
            tokens(rates(0.10, 0.70, 0.10, 0.10), 0.40),
        )
        .thinking(),
        Seed::google(
            "gemini-2.0-flash-lite",
            "Gemini 2.0 Flash Lite",
            tokens(rates(0.075, 0.30, 0.075, 0.075), 0.30),
        )
        .thinking(),
        // Video (Veo), billed per generated second
        Seed::google(
            "veo-3.1-generate-preview",
            "Veo 3.1 Standard (Video)",
            media(0.40, OutputUnit::Seconds),
        ),
        Seed::google(
            "veo-3.1-fast-generate-preview",
            "Veo 3.1 Fast (Video)",
            media(0.15, OutputUnit::Seconds),
        ),
        Seed::google(
            "veo-2.0-generate-001",
            "Veo 2.0 (Video)",
            media(0.35, OutputUnit::Seconds),
        ),
        // Image (Imagen), billed per generated image
        Seed::google(
            "imagen-4.0-fast-generate-001",
            "Imagen 4 Fast (Image)",
            media(0.02, OutputUnit::Count),
        ),
        Seed::google(
            "imagen-4.0-generate-001",
            "Imagen 4 Standard (Image)",
            media(0.04, OutputUnit::Count),
        ),
        Seed::google(
            "imagen-4.0-ultra-generate-001",
            "Imagen 4 Ultra (Image)",
            media(0.06, OutputUnit::Count),
        ),
        Seed::google(
            "imagen-3.0-generate-002",
            "Imagen 3 (Image)",
            media(0.03, OutputUnit::Count),
        ),
        // Embeddings have no output charge
        Seed::google(
            "gemini-embedding-001",
            "Gemini Embedding 001",
            tokens(flat(0.15), 0.0),
        ),
        Seed {
            provider: Provider::Openai,
            ..Seed::google("gpt-4o", "GPT-4o", tokens(flat(5.00), 15.00))
        },
    ];

    seeds.into_iter().map(Seed::into_entry).collect()
}
