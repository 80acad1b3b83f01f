//! Applies a rate table to normalized usage
//!
//! The calculator is data-driven: model quirks (audio output override, image
//! billing policy) come from the pricing entry, never from the model id.

use crate::consts::{DEFAULT_VIDEO_SECONDS, PER_MILLION};
use crate::pricing::{ImageOutputPricing, OutputUnit, RateTable};

use super::types::{Approximation, ModalityLineItem, NormalizedUsage};

/// Costs before assembly into a `CostEstimate`
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CostParts {
    pub(crate) input_cost: f64,
    pub(crate) input_breakdown: Vec<ModalityLineItem>,
    pub(crate) output_cost: f64,
    /// Output total in the rate table's unit
    pub(crate) output_units: u64,
    pub(crate) approximations: Vec<Approximation>,
}

fn per_million(units: u64, rate: f64) -> f64 {
    (units as f64 / PER_MILLION) * rate
}

pub(crate) fn compute_cost(
    rates: &RateTable,
    usage: &NormalizedUsage,
    image_output: &ImageOutputPricing,
) -> CostParts {
    let mut parts = CostParts::default();

    for (modality, units) in &usage.input_units {
        let unit_rate = rates.input.rate_for(modality);
        let cost = per_million(*units, unit_rate);
        parts.input_cost += cost;
        parts.input_breakdown.push(ModalityLineItem {
            modality: modality.clone(),
            units: *units,
            unit_rate,
            cost,
        });
    }

    match rates.output_unit {
        OutputUnit::Tokens => token_output(rates, usage, image_output, &mut parts),
        OutputUnit::Seconds => {
            parts.output_units = usage.duration_seconds;
            parts.output_cost = usage.duration_seconds as f64 * rates.output;
            if usage.videos_without_duration > 0 {
                parts.approximations.push(Approximation::AssumedVideoDuration {
                    videos: usage.videos_without_duration,
                    seconds_per_video: DEFAULT_VIDEO_SECONDS,
                });
            }
        }
        OutputUnit::Count => {
            parts.output_units = usage.generated_media_count;
            parts.output_cost = usage.generated_media_count as f64 * rates.output;
        }
    }

    // Flat image pricing is independent of the output unit
    if !matches!(rates.output_unit, OutputUnit::Tokens)
        && let ImageOutputPricing::FixedPerImage { price } = image_output
        && usage.generated_images > 0
    {
        parts.output_cost += usage.generated_images as f64 * price;
    }

    parts
}

fn token_output(
    rates: &RateTable,
    usage: &NormalizedUsage,
    image_output: &ImageOutputPricing,
    parts: &mut CostParts,
) {
    let image_tokens = usage.image_output_units.unwrap_or(0);
    let mut billable = usage
        .text_output_units
        .saturating_add(usage.thinking_output_units);
    let mut extra_cost = 0.0;
    parts.output_units = billable
        .saturating_add(usage.audio_output_units)
        .saturating_add(image_tokens);

    match rates.audio_output {
        Some(audio_rate) => {
            if usage.audio_output_units > 0 {
                extra_cost += per_million(usage.audio_output_units, audio_rate);
            }
        }
        None => billable = billable.saturating_add(usage.audio_output_units),
    }

    match *image_output {
        ImageOutputPricing::OutputTokens => billable = billable.saturating_add(image_tokens),
        ImageOutputPricing::TokenRate {
            rate,
            placeholder_tokens_per_image,
        } => match (usage.image_output_units, placeholder_tokens_per_image) {
            (Some(tokens), _) => extra_cost += per_million(tokens, rate),
            (None, Some(per_image)) if usage.generated_images > 0 => {
                let tokens = usage.generated_images.saturating_mul(per_image);
                extra_cost += per_million(tokens, rate);
                parts.output_units = parts.output_units.saturating_add(tokens);
                parts.approximations.push(Approximation::PlaceholderImageTokens {
                    images: usage.generated_images,
                    tokens_per_image: per_image,
                });
            }
            _ => {}
        },
        ImageOutputPricing::FixedPerImage { price } => {
            extra_cost += usage.generated_images as f64 * price;
            if usage.image_output_units.is_none()
                && usage.generated_images > 0
                && usage.text_output_units > 0
            {
                parts.approximations.push(Approximation::UnsplitImageTokens {
                    images: usage.generated_images,
                    candidate_tokens: usage.text_output_units,
                });
            }
        }
    }

    parts.output_cost = per_million(billable, rates.output) + extra_cost;
}
