// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, Xlsx};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CACHE_CONTROL;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

/// Where the workbook lives: a local file or an http(s) resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    Path(PathBuf),
    Url(String),
}

impl SheetSource {
    pub fn parse(spec: &str) -> Self {
        let trimmed = spec.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

/// Fetches the workbook and decodes its first worksheet into raw rows of
/// cell strings. Row 0 is the header row; normalization happens later.
pub fn load_rows(source: &SheetSource, timeout: Duration) -> Result<Vec<Vec<String>>> {
    let bytes = fetch_bytes(source, timeout)?;
    decode_rows(&bytes).with_context(|| format!("decode workbook from {}", source.describe()))
}

fn fetch_bytes(source: &SheetSource, timeout: Duration) -> Result<Vec<u8>> {
    match source {
        SheetSource::Path(path) => std::fs::read(path).with_context(|| {
            format!(
                "read workbook {} -- check data.source in the config",
                path.display()
            )
        }),
        SheetSource::Url(url) => {
            let http = HttpClient::builder()
                .timeout(timeout)
                .build()
                .context("build HTTP client")?;

            let response = http
                .get(url)
                .header(CACHE_CONTROL, "no-store")
                .send()
                .map_err(|error| connection_error(url, error))?;

            let status = response.status();
            if !status.is_success() {
                bail!("workbook fetch from {url} returned {status}");
            }
            Ok(response.bytes().context("read workbook body")?.to_vec())
        }
    }
}

/// Decodes the FIRST worksheet of an xlsx byte stream. Fails when the bytes
/// are not a workbook, the workbook has no worksheets, or the first
/// worksheet has zero rows.
pub fn decode_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).map_err(|error| anyhow!("open workbook: {error}"))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets"))?
        .map_err(|error| anyhow!("read first worksheet: {error}"))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    if rows.is_empty() {
        bail!("first worksheet has no rows -- expected a header row");
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => float_text(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => float_text(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
    }
}

// Whole numbers render without a trailing ".0" so case ids like 1042 keep
// their spreadsheet appearance.
fn float_text(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn connection_error(url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {url}: {error} -- check the URL and your network connection")
}

#[cfg(test)]
mod tests {
    use super::{SheetSource, cell_text, decode_rows, float_text, load_rows};
    use calamine::Data;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn source_parse_distinguishes_urls_from_paths() {
        assert_eq!(
            SheetSource::parse("https://example.com/data.xlsx"),
            SheetSource::Url("https://example.com/data.xlsx".to_owned()),
        );
        assert_eq!(
            SheetSource::parse(" data.xlsx "),
            SheetSource::Path(PathBuf::from("data.xlsx")),
        );
    }

    #[test]
    fn cell_text_defaults_empty_and_error_cells() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("ACME-100".to_owned())), "ACME-100");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }

    #[test]
    fn whole_floats_drop_the_decimal_point() {
        assert_eq!(float_text(1042.0), "1042");
        assert_eq!(float_text(-3.0), "-3");
        assert_eq!(float_text(1.5), "1.5");
    }

    #[test]
    fn missing_file_reports_the_path() {
        let source = SheetSource::Path(PathBuf::from("/nonexistent/data.xlsx"));
        let error = load_rows(&source, Duration::from_secs(1))
            .expect_err("missing file should fail");
        assert!(error.to_string().contains("data.source"));
    }

    #[test]
    fn non_workbook_bytes_are_rejected() {
        let error = decode_rows(b"not an xlsx").expect_err("garbage should fail");
        assert!(error.to_string().contains("open workbook"));
    }
}
