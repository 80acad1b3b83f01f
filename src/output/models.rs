use comfy_table::Cell;
use serde::Serialize;

use crate::pricing::{OutputUnit, PricingEntry, Provider};

use super::estimate::TableOptions;
use super::format::{create_styled_table, format_number, format_rate, header_cell, right_cell};

/// Catalog entries, optionally restricted to one vendor
pub(crate) fn select_models(entries: &[PricingEntry], provider: Option<Provider>) -> Vec<&PricingEntry> {
    entries
        .iter()
        .filter(|e| provider.is_none_or(|p| e.provider == p))
        .collect()
}

#[derive(Serialize)]
struct ModelsJson<'a> {
    models: Vec<&'a PricingEntry>,
}

pub(crate) fn models_json(entries: Vec<&PricingEntry>) -> impl Serialize + '_ {
    ModelsJson { models: entries }
}

pub(crate) fn print_models_table(entries: &[&PricingEntry], opts: TableOptions) {
    let c = opts.use_color;
    let fmt = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Model", c),
        header_cell("Label", c),
        header_cell("Provider", c),
        header_cell("Unit", c),
        header_cell("Input (text)", c),
        header_cell("Output", c),
        header_cell("High tier", c),
        header_cell("Thinking", c),
    ]);

    for entry in entries {
        let std = &entry.standard;
        let tiering = match (&entry.high, entry.breakpoint) {
            (Some(high), Some(b)) => format!(
                "> {}: {} / {}",
                format_number(b, fmt),
                format_rate(high.input.text, OutputUnit::Tokens, fmt),
                format_rate(high.output, high.output_unit, fmt),
            ),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(entry.display_label()),
            Cell::new(entry.provider.display_name()),
            Cell::new(std.output_unit.label()),
            right_cell(&format_rate(std.input.text, OutputUnit::Tokens, fmt), None, false),
            right_cell(&format_rate(std.output, std.output_unit, fmt), None, false),
            Cell::new(tiering),
            Cell::new(if entry.supports_thinking { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
    println!("  {} models", entries.len());
}
