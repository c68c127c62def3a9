//! Output formatting for record listings

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    Table,
    /// Pretty-printed JSON
    Json,
    /// CSV with a header row
    Csv,
}

/// Turn records into JSON objects keyed by normalized field name
pub fn to_rows<T: Serialize>(records: &[T]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).context("Failed to serialize record"))
        .collect()
}

/// Render rows; `columns` limits table and CSV output (all fields when empty)
pub fn format_rows(rows: &[Value], columns: &[&str], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(rows).context("Failed to format JSON output")
        }
        OutputFormat::Csv => rows_to_csv(rows, &headers(rows, columns)),
        OutputFormat::Table => Ok(rows_to_table(rows, &headers(rows, columns))),
    }
}

/// Render `(label, value)` pairs, e.g. service information
pub fn format_pairs(pairs: &[(&str, Option<String>)], format: OutputFormat) -> Result<String> {
    let object: serde_json::Map<String, Value> = pairs
        .iter()
        .map(|(k, v)| {
            let value = v.clone().map(Value::String).unwrap_or(Value::Null);
            (k.to_string(), value)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&object).context("Failed to format JSON output")
        }
        OutputFormat::Csv => {
            let row = Value::Object(object);
            let columns: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
            rows_to_csv(std::slice::from_ref(&row), &headers(&[], &columns))
        }
        OutputFormat::Table => {
            let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            let lines: Vec<String> = pairs
                .iter()
                .map(|(k, v)| {
                    let value = v.as_deref().unwrap_or("-");
                    format!("{}  {}", format!("{:width$}", k).bold(), value)
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

fn headers(rows: &[Value], columns: &[&str]) -> Vec<String> {
    if !columns.is_empty() {
        return columns.iter().map(|c| c.to_string()).collect();
    }

    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(obj) = row {
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    headers
}

fn cell(row: &Value, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn rows_to_csv(rows: &[Value], headers: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers).context("Failed to write CSV header")?;
    for row in rows {
        writer
            .write_record(headers.iter().map(|h| cell(row, h)))
            .context("Failed to write CSV row")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

fn rows_to_table(rows: &[Value], headers: &[String]) -> String {
    if rows.is_empty() {
        return "No results".dimmed().to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| headers.iter().map(|h| cell(row, h)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:w$}", h, w = *w).bold().to_string())
        .collect();
    lines.push(header.join("  ").trim_end().to_string());

    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:w$}", c, w = *w))
            .collect();
        lines.push(line.join("  ").trim_end().to_string());
    }
    lines.join("\n")
}
