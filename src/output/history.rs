use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::history::{HistoryEntry, RepriceReport};

use super::estimate::{TableOptions, print_estimate_detail};
use super::format::{create_styled_table, format_cost, format_number, header_cell, right_cell, tint};

const PROMPT_PREVIEW_CHARS: usize = 40;

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(PROMPT_PREVIEW_CHARS).collect();
    if line.chars().count() > PROMPT_PREVIEW_CHARS || text.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}

pub(crate) fn print_history_table(entries: &[HistoryEntry], opts: TableOptions) {
    if entries.is_empty() {
        println!("No history entries.");
        return;
    }
    let c = opts.use_color;
    let fmt = opts.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Id", c),
        header_cell("Time (UTC)", c),
        header_cell("Model", c),
        header_cell("Title / prompt", c),
        header_cell("Input", c),
        header_cell("Output", c),
        header_cell("Cost", c),
    ]);

    for entry in entries {
        let e = &entry.result.estimate;
        let label = entry.title.clone().unwrap_or_else(|| preview(&entry.prompt));
        table.add_row(vec![
            Cell::new(entry.id.get(..8).unwrap_or(&entry.id)),
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&entry.model),
            Cell::new(label),
            right_cell(&format_number(e.input_tokens, fmt), None, false),
            right_cell(&format_number(e.output_tokens, fmt), None, false),
            right_cell(&format_cost(e.total_cost, fmt), tint(Color::Green, c), false),
        ]);
    }

    let total: f64 = entries.iter().map(|e| e.result.estimate.total_cost).sum();
    println!("{table}");
    println!(
        "  {} entries, {} total",
        format_number(entries.len() as u64, fmt),
        format_cost(total, fmt)
    );
}

pub(crate) fn print_history_entry(entry: &HistoryEntry, opts: TableOptions) {
    println!("  id:        {}", entry.id);
    println!("  time:      {}", entry.timestamp.to_rfc3339());
    println!("  provider:  {}", entry.provider.display_name());
    if let Some(title) = &entry.title {
        println!("  title:     {title}");
    }
    println!("  thinking:  {}", entry.thinking.describe());
    for att in &entry.attachments {
        println!(
            "  attached:  {} ({}, {} bytes)",
            att.name,
            att.mime_type,
            format_number(att.size() as u64, opts.number_format)
        );
    }
    println!("  prompt:    {}", preview(&entry.prompt));
    print_estimate_detail(&entry.model, &entry.result.estimate, opts);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RepriceJson<'a> {
    repriced: usize,
    changed: usize,
    unpriced: Vec<UnpricedJson<'a>>,
    total_cost: f64,
}

#[derive(Serialize)]
struct UnpricedJson<'a> {
    id: &'a str,
    model: &'a str,
}

pub(crate) fn reprice_json(report: &RepriceReport, total_cost: f64) -> impl Serialize + '_ {
    RepriceJson {
        repriced: report.repriced,
        changed: report.changed,
        unpriced: report
            .unpriced
            .iter()
            .map(|(id, model)| UnpricedJson { id, model })
            .collect(),
        total_cost,
    }
}

pub(crate) fn print_reprice_summary(report: &RepriceReport, total_cost: f64, opts: TableOptions) {
    let fmt = opts.number_format;
    println!(
        "Repriced {} entries ({} changed), total {}",
        format_number(report.repriced as u64, fmt),
        format_number(report.changed as u64, fmt),
        format_cost(total_cost, fmt)
    );
    for (id, model) in &report.unpriced {
        println!("  kept old estimate for {id}: no price for {model}");
    }
}
