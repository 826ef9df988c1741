// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use casovista_app::{Dataset, SearchMode};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Queries shorter than this fall back to substring matching even in fuzzy
/// mode; one character is not enough signal for approximate matching.
pub const FUZZY_MIN_QUERY_LEN: usize = 2;

/// Lowercased key-field strings, one per record. Built once per dataset
/// load; must be rebuilt whenever the dataset is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndex {
    keys: Vec<String>,
}

impl SearchIndex {
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            keys: dataset
                .records
                .iter()
                .map(|record| record.key.to_lowercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Pure filter: `(dataset, index, query, mode)` to the matching record
/// indices, always in dataset order. Empty or whitespace-only queries
/// return every index. Cheap enough to run on every keystroke.
///
/// Fuzzy mode is subsequence-based: query characters must appear in the key
/// in order, so gaps are tolerated ("ac20" finds "acme-205") but transposed
/// characters ("amce") are not.
pub fn filter(
    dataset: &Dataset,
    index: &SearchIndex,
    query: &str,
    mode: SearchMode,
) -> Result<Vec<usize>> {
    if index.len() != dataset.len() {
        bail!(
            "search index covers {} records but the dataset has {} -- rebuild the index after reload",
            index.len(),
            dataset.len()
        );
    }

    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Ok((0..dataset.len()).collect());
    }

    let use_fuzzy = mode == SearchMode::Fuzzy && trimmed.chars().count() >= FUZZY_MIN_QUERY_LEN;
    if use_fuzzy {
        let matcher = SkimMatcherV2::default().ignore_case();
        Ok(index
            .keys
            .iter()
            .enumerate()
            .filter(|(_, key)| {
                matcher
                    .fuzzy_match(key, trimmed)
                    .is_some_and(|score| score > 0)
            })
            .map(|(position, _)| position)
            .collect())
    } else {
        let needle = trimmed.to_lowercase();
        Ok(index
            .keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.contains(&needle))
            .map(|(position, _)| position)
            .collect())
    }
}
