use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::core::CostEstimate;
use crate::pricing::OutputUnit;

use super::format::{
    NumberFormat, create_styled_table, format_cost, format_number, format_rate, header_cell,
    right_cell, tint,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

/// One priced usage report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EstimateRow {
    pub(crate) source: String,
    pub(crate) model: String,
    #[serde(flatten)]
    pub(crate) estimate: CostEstimate,
}

fn output_units(estimate: &CostEstimate, fmt: NumberFormat) -> String {
    let n = format_number(estimate.output_tokens, fmt);
    match estimate.output_unit {
        OutputUnit::Tokens => n,
        unit => format!("{n} {}", unit.label()),
    }
}

pub(crate) fn print_estimate_table(rows: &[EstimateRow], opts: TableOptions) {
    let c = opts.use_color;
    let fmt = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Source", c),
        header_cell("Model", c),
        header_cell("Input", c),
        header_cell("Output", c),
        header_cell("Thinking", c),
        header_cell("Tier", c),
        header_cell("Input $", c),
        header_cell("Output $", c),
        header_cell("Total $", c),
    ]);

    for row in rows {
        let e = &row.estimate;
        let tier = if e.is_high_tier { "high" } else { "standard" };
        let mut total = format_cost(e.total_cost, fmt);
        if e.is_approximate() {
            total.push('*');
        }
        table.add_row(vec![
            Cell::new(&row.source),
            Cell::new(&row.model),
            right_cell(&format_number(e.input_tokens, fmt), None, false),
            right_cell(&output_units(e, fmt), None, false),
            right_cell(&format_number(e.thinking_tokens, fmt), None, false),
            Cell::new(tier),
            right_cell(&format_cost(e.input_cost, fmt), None, false),
            right_cell(&format_cost(e.output_cost, fmt), None, false),
            right_cell(&total, tint(Color::Green, c), true),
        ]);
    }

    if rows.len() > 1 {
        let sum: f64 = rows.iter().map(|r| r.estimate.total_cost).sum();
        let mut footer = vec![Cell::new("Total")];
        footer.extend((0..7).map(|_| Cell::new("")));
        footer.push(right_cell(&format_cost(sum, fmt), tint(Color::Yellow, c), true));
        table.add_row(footer);
    }

    println!("{table}");
    if rows.iter().any(|r| r.estimate.is_approximate()) {
        println!("  * includes assumed values");
    }
}

/// Itemized view of one estimate
pub(crate) fn print_estimate_detail(model: &str, estimate: &CostEstimate, opts: TableOptions) {
    let c = opts.use_color;
    let fmt = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Item", c),
        header_cell("Units", c),
        header_cell("Rate", c),
        header_cell("Cost", c),
    ]);

    for line in &estimate.input_breakdown {
        table.add_row(vec![
            Cell::new(format!("input {}", line.modality)),
            right_cell(&format_number(line.units, fmt), None, false),
            right_cell(&format_rate(line.unit_rate, OutputUnit::Tokens, fmt), None, false),
            right_cell(&format_cost(line.cost, fmt), None, false),
        ]);
    }

    table.add_row(vec![
        Cell::new("output"),
        right_cell(&output_units(estimate, fmt), None, false),
        right_cell(
            &format_rate(estimate.output_rate, estimate.output_unit, fmt),
            None,
            false,
        ),
        right_cell(&format_cost(estimate.output_cost, fmt), None, false),
    ]);
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(""),
        Cell::new(if estimate.is_high_tier { "high tier" } else { "" }),
        right_cell(&format_cost(estimate.total_cost, fmt), tint(Color::Green, c), true),
    ]);

    println!("\n  {model}\n");
    println!("{table}");
    if estimate.output_unit == OutputUnit::Tokens && estimate.thinking_tokens > 0 {
        println!(
            "  output includes {} thinking tokens",
            format_number(estimate.thinking_tokens, fmt)
        );
    }
    for note in &estimate.approximations {
        println!("  estimate: {note}");
    }
}
