//! Core module - the cost-estimation engine
//!
//! Pure and synchronous; safe to call from any number of threads at once.

mod aggregator;
mod calculator;
mod engine;
mod normalize;
mod types;
mod usage;

pub(crate) use engine::estimate;
pub(crate) use types::{CostEstimate, Modality};
pub(crate) use usage::UsageReport;
