//! Parse uploaded transaction CSVs.
//!
//! Expected header (any order, extra columns ignored):
//! date,description,amount,Income/Expense
//!
//! Dates default to `DD-MM-YYYY HH:MM`; plain `YYYY-MM-DD` and `DD-MM-YYYY`
//! are accepted too. Rows with an unreadable date or amount are skipped.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use buddy_core::EntryType;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::types::{IngestRecord, UploadBatch};

pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

const REQUIRED_COLUMNS: [&str; 4] = ["date", "description", "amount", "Income/Expense"];

/// Parse an upload from disk.
pub fn parse_upload_csv(path: impl AsRef<Path>, date_format: &str) -> Result<UploadBatch> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_upload_reader(file, date_format).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_upload_reader<R: Read>(reader: R, date_format: &str) -> Result<UploadBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading header row")?.clone();
    let mut columns = [0usize; 4];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = match headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
            Some(i) => i,
            None => bail!("missing required column {name:?}"),
        };
    }
    let [date_col, desc_col, amount_col, type_col] = columns;

    let mut batch = UploadBatch::default();
    for (line, result) in rdr.records().enumerate() {
        // header is line 1
        let row = line + 2;
        let record = result.with_context(|| format!("reading row {row}"))?;

        let raw_date = record.get(date_col).unwrap_or("");
        let Some(date) = parse_date(raw_date, date_format) else {
            warn!(row, date = raw_date, "skipping row with unreadable date");
            batch.skipped += 1;
            continue;
        };

        let raw_amount = record.get(amount_col).unwrap_or("");
        let amount = match parse_amount(raw_amount) {
            Some(a) if a >= 0.0 => a,
            _ => {
                warn!(row, amount = raw_amount, "skipping row with unreadable amount");
                batch.skipped += 1;
                continue;
            }
        };

        batch.records.push(IngestRecord {
            date,
            description: record.get(desc_col).unwrap_or("").to_string(),
            amount,
            entry_type: EntryType::from(record.get(type_col).unwrap_or("")),
        });
    }

    debug!(parsed = batch.records.len(), skipped = batch.skipped, "upload parsed");
    Ok(batch)
}

fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    std::iter::once(format)
        .chain(FALLBACK_DATE_FORMATS.iter().copied())
        .find_map(|fmt| {
            NaiveDateTime::parse_from_str(raw, fmt)
                .map(|dt| dt.date())
                .or_else(|_| NaiveDate::parse_from_str(raw, fmt))
                .ok()
        })
}

/// Accepts thousands separators and a leading rupee sign.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|a| a.is_finite())
}
