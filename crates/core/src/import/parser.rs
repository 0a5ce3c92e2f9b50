//! Header and row validation.

use std::str::FromStr;

use assetra_shared::types::UnitId;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{CandidateRow, ImportBatch};
use crate::asset::{AssetStatus, CREATABLE_STATUSES, NewAsset};
use crate::error::{EngineError, RowError};

/// Column names, in order, compared case-insensitively.
pub const EXPECTED_HEADER: [&str; 7] = [
    "name",
    "category",
    "unit_id",
    "value",
    "purchasedate",
    "usefullife",
    "status",
];

/// Fields per row.
pub const FIELD_COUNT: usize = EXPECTED_HEADER.len();

/// Validate CSV text into an [`ImportBatch`].
///
/// The first non-blank line is the header and is row 1; every later line
/// keeps its physical distance from the header as its row number, so blank
/// lines still count even though they are skipped.
///
/// # Errors
///
/// `Format` if there is no header or it does not match [`EXPECTED_HEADER`].
/// Row problems are collected into the batch, not returned here.
pub fn parse(text: &str) -> Result<ImportBatch, EngineError> {
    let mut lines = text
        .strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .enumerate()
        .skip_while(|(_, line)| line.trim().is_empty());

    let (header_index, header) = lines
        .next()
        .ok_or_else(|| EngineError::Format("file is empty".to_string()))?;
    check_header(header)?;

    let mut batch = ImportBatch::default();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = index - header_index + 1;
        match parse_row(row, line) {
            Ok(asset) => batch.rows.push(CandidateRow { row, asset }),
            Err(mut errors) => batch.errors.append(&mut errors),
        }
    }

    tracing::debug!(
        rows = batch.rows.len(),
        errors = batch.errors.len(),
        "import batch validated"
    );
    Ok(batch)
}

fn check_header(line: &str) -> Result<(), EngineError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let matches = fields.len() == FIELD_COUNT
        && fields
            .iter()
            .zip(EXPECTED_HEADER)
            .all(|(got, want)| got.eq_ignore_ascii_case(want));
    if matches {
        Ok(())
    } else {
        Err(EngineError::Format(format!(
            "header must be `{}`, got `{}`",
            EXPECTED_HEADER.join(","),
            line.trim()
        )))
    }
}

/// Validate one data line, running every field check.
fn parse_row(row: usize, line: &str) -> Result<NewAsset, Vec<RowError>> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(vec![RowError::row(
            row,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        )]);
    }

    let mut errors = Vec::new();
    let name = required(row, "name", fields[0], &mut errors);
    let category = required(row, "category", fields[1], &mut errors);
    let unit_id = collect(parse_unit(row, fields[2]), &mut errors);
    let value = collect(parse_value(row, fields[3]), &mut errors);
    let purchase_date = collect(parse_date(row, fields[4]), &mut errors);
    let useful_life_years = collect(parse_useful_life(row, fields[5]), &mut errors);
    let status = collect(parse_status(row, fields[6]), &mut errors);

    match (
        name,
        category,
        unit_id,
        value,
        purchase_date,
        useful_life_years,
        status,
    ) {
        (
            Some(name),
            Some(category),
            Some(unit_id),
            Some(value),
            Some(purchase_date),
            Some(useful_life_years),
            Some(status),
        ) if errors.is_empty() => Ok(NewAsset {
            name,
            category,
            unit_id,
            value,
            purchase_date,
            useful_life_years,
            status,
        }),
        _ => Err(errors),
    }
}

fn collect<T>(result: Result<T, RowError>, errors: &mut Vec<RowError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

fn required(
    row: usize,
    field: &'static str,
    raw: &str,
    errors: &mut Vec<RowError>,
) -> Option<String> {
    if raw.is_empty() {
        errors.push(RowError::field(row, field, "is required"));
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_unit(row: usize, raw: &str) -> Result<Option<UnitId>, RowError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .ok()
        .and_then(UnitId::new)
        .map(Some)
        .ok_or_else(|| {
            RowError::field(row, "unit_id", format!("`{raw}` is not a unit number (>= 1)"))
        })
}

fn parse_value(row: usize, raw: &str) -> Result<Decimal, RowError> {
    let value = Decimal::from_str(raw)
        .map_err(|_| RowError::field(row, "value", format!("`{raw}` is not a number")))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RowError::field(row, "value", "must not be negative"));
    }
    Ok(value.trunc().normalize())
}

fn parse_useful_life(row: usize, raw: &str) -> Result<u32, RowError> {
    raw.parse::<u32>().map_err(|_| {
        RowError::field(
            row,
            "useful_life",
            format!("`{raw}` is not a whole number of years (>= 0)"),
        )
    })
}

fn parse_date(row: usize, raw: &str) -> Result<NaiveDate, RowError> {
    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(RowError::field(
            row,
            "purchase_date",
            format!("`{raw}` is not in YYYY-MM-DD form"),
        ));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        RowError::field(row, "purchase_date", format!("`{raw}` is not a calendar date"))
    })
}

fn parse_status(row: usize, raw: &str) -> Result<AssetStatus, RowError> {
    let status = AssetStatus::parse(raw)
        .ok_or_else(|| RowError::field(row, "status", format!("unknown status `{raw}`")))?;
    if !status.is_creatable() {
        let allowed: Vec<&str> = CREATABLE_STATUSES.iter().map(AssetStatus::as_str).collect();
        return Err(RowError::field(
            row,
            "status",
            format!(
                "new assets cannot start as {status}; use one of {}",
                allowed.join(", ")
            ),
        ));
    }
    Ok(status)
}
