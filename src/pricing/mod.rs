mod cache;
mod catalog;
mod fetcher;
mod loader;
mod tier;
mod types;

pub(crate) use catalog::Catalog;
pub(crate) use loader::CatalogOptions;
pub(crate) use tier::select_tier;
pub(crate) use types::{ImageOutputPricing, OutputUnit, PricingEntry, Provider, RateTable};
