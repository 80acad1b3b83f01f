mod estimate;
mod format;
mod history;
mod json;
mod models;

pub(crate) use estimate::{EstimateRow, TableOptions, print_estimate_detail, print_estimate_table};
pub(crate) use format::NumberFormat;
pub(crate) use history::{print_history_entry, print_history_table, print_reprice_summary, reprice_json};
pub(crate) use json::emit_json;
pub(crate) use models::{models_json, print_models_table, select_models};
