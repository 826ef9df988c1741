// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Shared fixtures for the workspace's tests: raw sheet rows as a decoder
//! would produce them, hand-built datasets, and temp paths for store tests.

use anyhow::{Context, Result};
use casovista_app::{Dataset, Headers, Record};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn raw_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_owned()).collect()
}

/// A representative sheet: twelve columns (one blank-named, one accent), an
/// all-empty row between data rows, and rows shorter than the header list.
pub fn sample_raw_rows() -> Vec<Vec<String>> {
    vec![
        raw_row(&[
            "ID",
            "Caso",
            "Tema",
            "Tipo de Tarea",
            "Estado",
            "Prioridad",
            "Fecha",
            "Responsable",
            "Verificación",
            "Observaciones",
            "Color",
            "",
        ]),
        raw_row(&[
            "1",
            "ACME-100",
            "Billing",
            "Support",
            "Open",
            "Alta",
            "2026-01-10",
            "Rivera",
            "Sí",
            "Cliente llamó dos veces",
            "verde",
            "x",
        ]),
        raw_row(&["", "", "", "", "", "", "", "", "", "", "", ""]),
        raw_row(&[
            "2",
            "ACME-205",
            "Facturación",
            "Incidencia",
            "Cerrado",
            "Baja",
            "2026-01-12",
            "Soto",
            "No",
            "",
            "#f80",
        ]),
        raw_row(&["3", "BETA-7", "Red"]),
    ]
}

/// The smallest meaningful sheet: a header row and a single data row.
pub fn minimal_rows() -> Vec<Vec<String>> {
    vec![
        raw_row(&["ID", "Caso", "Tema", "Tipo de Tarea", "Estado"]),
        raw_row(&["1", "ACME-100", "Billing", "Support", "Open"]),
    ]
}

/// A dataset built by hand, for tests that do not want to run the
/// normalizer first.
pub fn manual_dataset() -> Dataset {
    let headers = Headers::new(
        ["ID", "Caso", "Tema", "Estado", "Color"]
            .into_iter()
            .map(str::to_owned)
            .collect(),
    );
    let records = vec![
        manual_record(&["1", "ACME-100", "Billing", "Open"], Some("verde")),
        manual_record(&["2", "ACME-205", "Facturación", "Cerrado"], None),
        manual_record(&["3", "BETA-7", "Red", "Open"], Some("sin color")),
    ];
    Dataset { headers, records }
}

fn manual_record(cells: &[&str], accent: Option<&str>) -> Record {
    let mut cells: Vec<String> = cells.iter().map(|cell| (*cell).to_owned()).collect();
    cells.push(accent.unwrap_or_default().to_owned());
    Record {
        key: cells.get(1).cloned().unwrap_or_default(),
        accent: accent.map(str::to_owned),
        cells,
    }
}

/// A temp directory plus a database path inside it. Keep the directory
/// alive for as long as the store is open.
pub fn temp_db_path() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("create temp dir for store test")?;
    let path = dir.path().join("casovista.db");
    Ok((dir, path))
}
