use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::app::{GlobalOptions, Units};

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Formats `bytes` in `units`; percentages are relative to `total`.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64, total: u64, units: Units) -> String {
    match units {
        Units::Bytes => bytes.to_string(),
        Units::Kb => format!("{} kb", trim_decimals(bytes as f64 / 1024.0)),
        Units::Percent => {
            let share = if total == 0 {
                0.0
            } else {
                bytes as f64 * 100.0 / total as f64
            };
            format!("{}%", trim_decimals(share))
        }
    }
}

/// Two decimals at most, without trailing zeros.
fn trim_decimals(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Tabular writer backed by `comfy-table` for whitespace-aligned CLI output.
pub struct TabWriter {
    table: Table,
}

impl TabWriter {
    /// Create a new `TabWriter` with the given `(header, alignment)` columns.
    pub fn new(columns: Vec<(&str, Align)>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let headers: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        table.set_header(headers);

        // First column: no left padding. Last column: no right padding.
        let last = columns.len().saturating_sub(1);
        for (i, (_, align)) in columns.iter().enumerate() {
            let cell_align = match align {
                Align::Left => CellAlignment::Left,
                Align::Right => CellAlignment::Right,
            };
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(cell_align);
                let pad_left = if i == 0 { 0 } else { 1 };
                let pad_right = if i == last { 0 } else { 1 };
                col.set_padding((pad_left, pad_right));
            }
        }

        Self { table }
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        let output = self.table.to_string();
        for line in output.lines() {
            println!("{}", line.trim_end());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kb() {
        assert_eq!(format_size(1024, 0, Units::Kb), "1 kb");
        assert_eq!(format_size(1536, 0, Units::Kb), "1.5 kb");
        assert_eq!(format_size(1000, 0, Units::Kb), "0.98 kb");
        assert_eq!(format_size(0, 0, Units::Kb), "0 kb");
        assert_eq!(format_size(10 * 1024, 0, Units::Kb), "10 kb");
    }

    #[test]
    fn test_format_bytes_and_percent() {
        assert_eq!(format_size(880, 1000, Units::Bytes), "880");
        assert_eq!(format_size(880, 1000, Units::Percent), "88%");
        assert_eq!(format_size(1, 3, Units::Percent), "33.33%");
        assert_eq!(format_size(5, 0, Units::Percent), "0%");
        assert_eq!(format_size(5, 5, Units::Percent), "100%");
    }
}
