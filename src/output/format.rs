use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::error::AppError;
use crate::pricing::OutputUnit;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" | "it" | "es" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "zh" | "ja" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }

    fn localize_decimal(self, s: String) -> String {
        if self.decimal_sep == '.' {
            s
        } else {
            s.replace('.', &self.decimal_sep.to_string())
        }
    }
}

pub(super) fn format_number(n: u64, format: NumberFormat) -> String {
    let digits = n.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(format.group_sep);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Dollar amount with six decimals; sub-cent costs are the norm here
pub(super) fn format_cost(cost: f64, format: NumberFormat) -> String {
    format.localize_decimal(format!("${cost:.6}"))
}

/// Rate in its unit, e.g. `$0.50/1M` or `$0.40/sec`
pub(super) fn format_rate(rate: f64, unit: OutputUnit, format: NumberFormat) -> String {
    let digits = if rate != 0.0 && rate < 0.01 { 4 } else { 2 };
    let s = format!("${rate:.digits$}");
    format!("{}{}", format.localize_decimal(s), unit.rate_suffix())
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// Color only when enabled
pub(super) fn tint(color: Color, use_color: bool) -> Option<Color> {
    use_color.then_some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_with_commas() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(0, fmt), "0");
        assert_eq!(format_number(999, fmt), "999");
        assert_eq!(format_number(1000, fmt), "1,000");
        assert_eq!(format_number(1_234_567, fmt), "1,234,567");
    }

    #[test]
    fn format_cost_six_decimals() {
        let fmt = NumberFormat::default();
        assert_eq!(format_cost(2.0, fmt), "$2.000000");
        assert_eq!(format_cost(0.039, fmt), "$0.039000");
        assert_eq!(format_cost(0.0000004, fmt), "$0.000000");
    }

    #[test]
    fn format_cost_localized() {
        let fmt = NumberFormat::from_locale(Some("de")).unwrap();
        assert_eq!(format_cost(1.5, fmt), "$1,500000");
    }

    #[test]
    fn format_rate_units() {
        let fmt = NumberFormat::default();
        assert_eq!(format_rate(0.5, OutputUnit::Tokens, fmt), "$0.50/1M");
        assert_eq!(format_rate(0.4, OutputUnit::Seconds, fmt), "$0.40/sec");
        assert_eq!(format_rate(0.04, OutputUnit::Count, fmt), "$0.04/item");
        assert_eq!(format_rate(0.0, OutputUnit::Tokens, fmt), "$0.00/1M");
    }

    #[test]
    fn from_locale_none_or_empty_returns_default() {
        let fmt = NumberFormat::from_locale(None).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
        let fmt = NumberFormat::from_locale(Some(" ")).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
    }

    #[test]
    fn from_locale_with_region_suffix() {
        let fmt = NumberFormat::from_locale(Some("fr_FR")).unwrap();
        assert_eq!(format_number(1000, fmt), "1 000");
    }

    #[test]
    fn from_locale_unsupported_returns_error() {
        let err = NumberFormat::from_locale(Some("xx")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported locale: xx");
    }
}
