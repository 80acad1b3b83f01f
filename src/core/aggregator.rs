//! Assembles calculator output into the final estimate

use crate::pricing::RateTable;

use super::calculator::CostParts;
use super::types::{CostEstimate, NormalizedUsage};

/// Package computed parts; no cost is recomputed here
pub(crate) fn aggregate(
    parts: CostParts,
    usage: &NormalizedUsage,
    rates: &RateTable,
    is_high_tier: bool,
) -> CostEstimate {
    CostEstimate {
        total_cost: parts.input_cost + parts.output_cost,
        input_cost: parts.input_cost,
        output_cost: parts.output_cost,
        input_tokens: usage.total_input_units,
        output_tokens: parts.output_units,
        output_unit: rates.output_unit,
        thinking_tokens: usage.thinking_output_units,
        text_tokens: usage.text_output_units,
        input_breakdown: parts.input_breakdown,
        output_rate: rates.output,
        is_high_tier,
        approximations: parts.approximations,
    }
}
