// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::headers::Headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    Exact,
    Fuzzy,
}

impl SearchMode {
    pub const ALL: [Self; 2] = [Self::Exact, Self::Fuzzy];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exact" => Some(Self::Exact),
            "fuzzy" => Some(Self::Fuzzy),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "exacta",
            Self::Fuzzy => "difusa",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Exact => Self::Fuzzy,
            Self::Fuzzy => Self::Exact,
        }
    }
}

/// One normalized data row. Cells are aligned to the dataset's headers;
/// `key` duplicates the second column's value for search and labeling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub cells: Vec<String>,
    pub key: String,
    pub accent: Option<String>,
}

impl Record {
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map_or("", String::as_str)
    }
}

/// The full ordered record sequence for the currently loaded sheet.
/// Read-only after load; replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Headers,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            headers: Headers::new(Vec::new()),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Value of the column resolved from `label`, or `None` when no header
    /// matches. An empty cell resolves to `Some("")`.
    pub fn value_for_label<'a>(&self, record: &'a Record, label: &str) -> Option<&'a str> {
        self.headers.resolve(label).map(|column| record.cell(column))
    }
}
