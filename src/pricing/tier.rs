use super::types::{PricingEntry, RateTable};

/// Pick the rate table for a request of `total_input_units`.
///
/// The high tier applies only when the entry declares a breakpoint, has a high
/// table, and the input is strictly above the breakpoint.
pub(crate) fn select_tier(entry: &PricingEntry, total_input_units: u64) -> (&RateTable, bool) {
    match (entry.breakpoint, &entry.high) {
        (Some(breakpoint), Some(high)) if total_input_units > breakpoint => (high, true),
        _ => (&entry.standard, false),
    }
}
