// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use casovista_app::{Dataset, Headers, KEY_COLUMN, Record, placeholder_header};

/// Converts raw decoded rows into a dataset. Row 0 supplies the headers
/// (trimmed, blanks replaced with synthesized names); data rows whose cells
/// are all empty strings are dropped (whitespace counts as content); the
/// rest are zipped against the header list, padding missing cells with empty
/// strings and ignoring extras.
pub fn normalize(raw_rows: &[Vec<String>]) -> Result<Dataset> {
    let Some((header_row, data_rows)) = raw_rows.split_first() else {
        bail!("no rows to normalize -- the decoded worksheet was empty");
    };

    let names: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(column, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                placeholder_header(column)
            } else {
                trimmed.to_owned()
            }
        })
        .collect();
    let headers = Headers::new(names);
    let accent_column = headers.accent_column();
    let width = headers.len();

    let records = data_rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            let cells: Vec<String> = (0..width)
                .map(|column| row.get(column).cloned().unwrap_or_default())
                .collect();
            let key = cells.get(KEY_COLUMN).cloned().unwrap_or_default();
            let accent = accent_column.and_then(|column| {
                let value = cells.get(column)?;
                if value.trim().is_empty() {
                    None
                } else {
                    Some(value.clone())
                }
            });
            Record { cells, key, accent }
        })
        .collect();

    Ok(Dataset { headers, records })
}
