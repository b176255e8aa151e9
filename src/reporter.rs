/**
This module prettyprints a `PRCounter`. The plain table reads like a dataframe: one line per row
label, one column per count or ratio. The same table can be written as CSV, HTML or JSON.
*/
use crate::counter::{PRCounter, Row};
use crate::error::Result;
use enum_iterator::{all, Sequence};
use itertools::Itertools;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub const COLUMNS: [&str; 9] = ["Numer", "PDenom", "RDenom", "P", "R", "F", "T", "N", "Acc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Sequence)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Html,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str_content = match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Json => "json",
        };
        write!(f, "{}", str_content)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Impossible to parse the string ({0}) into an output format. Expected one of: {1}")]
pub struct OutputFormatParsingError(String, String);

impl FromStr for OutputFormat {
    type Err = OutputFormatParsingError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "string" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParsingError(
                String::from(s),
                all::<OutputFormat>().join(", "),
            )),
        }
    }
}

fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else {
        format!("{:.6}", value)
    }
}

/// Cells of a row in `COLUMNS` order, for the plain table.
fn table_cells(row: &Row) -> [String; 9] {
    let optional = |v: Option<usize>| v.map(|v| v.to_string()).unwrap_or_default();
    [
        row.numer.to_string(),
        row.pdenom.to_string(),
        row.rdenom.to_string(),
        format_ratio(row.precision),
        format_ratio(row.recall),
        format_ratio(row.fscore),
        optional(row.correct),
        optional(row.n),
        row.accuracy.map(format_ratio).unwrap_or_default(),
    ]
}

/// Cells of a row in `COLUMNS` order, for CSV. Undefined ratios are left empty.
fn csv_cells(row: &Row) -> [String; 9] {
    let ratio = |v: f64| if v.is_nan() { String::new() } else { v.to_string() };
    let optional = |v: Option<usize>| v.map(|v| v.to_string()).unwrap_or_default();
    [
        row.numer.to_string(),
        row.pdenom.to_string(),
        row.rdenom.to_string(),
        ratio(row.precision),
        ratio(row.recall),
        ratio(row.fscore),
        optional(row.correct),
        optional(row.n),
        row.accuracy.map(ratio).unwrap_or_default(),
    ]
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl PRCounter {
    /// Plain-text table with right-aligned columns.
    pub fn to_table(&self) -> String {
        let rows: Vec<(&str, [String; 9])> = self
            .rows()
            .map(|(label, row)| (label, table_cells(row)))
            .collect();
        let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter()
                    .map(|(_, cells)| cells[i].len())
                    .chain(std::iter::once(column.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let mut out = String::new();
        out.push_str(&" ".repeat(label_width));
        for (column, width) in COLUMNS.iter().zip(widths.iter()) {
            out.push_str(&format!("  {:>width$}", column, width = width));
        }
        out.push('\n');
        for (label, cells) in rows.iter() {
            out.push_str(&format!("{:<width$}", label, width = label_width));
            for (cell, width) in cells.iter().zip(widths.iter()) {
                out.push_str(&format!("  {:>width$}", cell, width = width));
            }
            out.push('\n');
        }
        out
    }

    pub fn to_csv(&self) -> String {
        let mut out = format!(",{}\n", COLUMNS.join(","));
        for (label, row) in self.rows() {
            out.push_str(&csv_field(label));
            for cell in csv_cells(row).iter() {
                out.push(',');
                out.push_str(cell);
            }
            out.push('\n');
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr>\n      <th></th>\n");
        for column in COLUMNS.iter() {
            out.push_str(&format!("      <th>{}</th>\n", column));
        }
        out.push_str("    </tr>\n  </thead>\n  <tbody>\n");
        for (label, row) in self.rows() {
            out.push_str(&format!("    <tr>\n      <th>{}</th>\n", html_escape(label)));
            for cell in table_cells(row).iter() {
                out.push_str(&format!("      <td>{}</td>\n", cell));
            }
            out.push_str("    </tr>\n");
        }
        out.push_str("  </tbody>\n</table>\n");
        out
    }

    /// JSON object keyed by row label. Undefined ratios become `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.to_table()),
            OutputFormat::Csv => Ok(self.to_csv()),
            OutputFormat::Html => Ok(self.to_html()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

/// The PRCounter acts as a dataframe when displayed.
impl Display for PRCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_table())
    }
}
