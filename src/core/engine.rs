use crate::error::AppError;
use crate::pricing::{Catalog, select_tier};

use super::aggregator::aggregate;
use super::calculator::compute_cost;
use super::normalize::normalize;
use super::types::{CostEstimate, Modality};
use super::usage::UsageReport;

/// Estimate one call: lookup → normalize → tier → compute → aggregate
pub(crate) fn estimate(
    catalog: &Catalog,
    model: &str,
    report: &UsageReport,
) -> Result<CostEstimate, AppError> {
    let entry = catalog.get(model)?;
    let usage = normalize(report, Modality::Text);
    let (rates, is_high_tier) = select_tier(entry, usage.total_input_units);
    let parts = compute_cost(rates, &usage, &entry.image_output);
    let estimate = aggregate(parts, &usage, rates, is_high_tier);

    tracing::debug!(
        model,
        input_units = usage.total_input_units,
        high_tier = is_high_tier,
        total_cost = estimate.total_cost,
        "estimated"
    );
    Ok(estimate)
}
