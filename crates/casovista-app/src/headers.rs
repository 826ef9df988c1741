// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Column index whose value identifies a record (the "Caso" column).
pub const KEY_COLUMN: usize = 1;

/// Alias that always resolves to the key field, never to a header lookup.
pub const KEY_LABEL: &str = "Caso";

/// Headers matching any of these (first hit wins) supply the card subtitle.
pub const SUBTITLE_LABELS: [&str; 2] = ["Tema", "Topic"];

/// Header pattern for the column used only for card tinting.
pub const ACCENT_LABEL: &str = "Color";

/// Candidate labels for the card meta line, in display order.
pub const META_LABELS: [&str; 5] = [
    "Tipo de Tarea",
    "Estado",
    "Prioridad",
    "Fecha",
    "Responsable",
];

/// Header patterns for the two quick-summary fields shown beside the key.
pub const VERIFY_LABEL: &str = "verific";
pub const NOTES_LABEL: &str = "observ";

/// Preferred label order for the detail panel. Remaining headers follow in
/// column order.
pub const DETAIL_LABELS: [&str; 9] = [
    "Caso",
    "Tema",
    "Tipo de Tarea",
    "Estado",
    "Prioridad",
    "Fecha",
    "Responsable",
    "Verificación",
    "Observaciones",
];

/// Maximum number of columns shown in the card list header row.
pub const CARD_HEADER_COLUMNS: usize = 8;

/// Ordered column names for one loaded sheet. Blank raw headers are replaced
/// with synthesized `Columna <letter>` names before construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    names: Vec<String>,
    accent: Option<usize>,
}

impl Headers {
    pub fn new(names: Vec<String>) -> Self {
        let accent = resolve(&names, ACCENT_LABEL);
        Self { names, accent }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, column: usize) -> Option<&str> {
        self.names.get(column).map(String::as_str)
    }

    /// Column index of the accent header, if the sheet has one.
    pub fn accent_column(&self) -> Option<usize> {
        self.accent
    }

    /// Resolves a display label to a column index: exact case-insensitive
    /// match first, then first header containing the label, else `None`.
    pub fn resolve(&self, label: &str) -> Option<usize> {
        resolve(&self.names, label)
    }

    /// Resolves the first label of `labels` that maps to a column.
    pub fn resolve_first(&self, labels: &[&str]) -> Option<usize> {
        labels.iter().find_map(|label| self.resolve(label))
    }
}

fn resolve(names: &[String], label: &str) -> Option<usize> {
    let needle = label.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(exact) = names
        .iter()
        .position(|name| name.to_lowercase() == needle)
    {
        return Some(exact);
    }
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&needle))
}

/// Excel-style letter for a zero-based column index: A..Z, AA, AB, ...
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remainder = index;
    loop {
        letters.push(b'A' + (remainder % 26) as u8);
        if remainder < 26 {
            break;
        }
        remainder = remainder / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_else(|_| "A".to_owned())
}

/// Synthesized name for a column whose raw header is blank.
pub fn placeholder_header(index: usize) -> String {
    format!("Columna {}", column_letter(index))
}
