// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use casovista_app::Dataset;
use casovista_db::Store;
use casovista_sheet::{SheetSource, load_rows, normalize};
use casovista_telemetry::Reporter;
use std::time::Duration;

/// Wires the UI to the real loader, store, and reporter.
pub struct CliRuntime<'a> {
    store: &'a Store,
    source: SheetSource,
    fetch_timeout: Duration,
    reporter: Option<Reporter>,
}

impl<'a> CliRuntime<'a> {
    pub fn new(
        store: &'a Store,
        source: SheetSource,
        fetch_timeout: Duration,
        reporter: Option<Reporter>,
    ) -> Self {
        Self {
            store,
            source,
            fetch_timeout,
            reporter,
        }
    }
}

impl casovista_tui::AppRuntime for CliRuntime<'_> {
    fn load_dataset(&mut self) -> Result<Dataset> {
        let rows = load_rows(&self.source, self.fetch_timeout)?;
        normalize(&rows)
    }

    fn stored_user(&mut self) -> Result<String> {
        self.store.active_user()
    }

    fn save_user(&mut self, name: &str) -> Result<()> {
        self.store.set_active_user(name)
    }

    fn delete_user(&mut self) -> Result<()> {
        self.store.clear_active_user()
    }

    fn report_selection(&mut self, user: &str, case_key: &str) {
        let Some(reporter) = &self.reporter else {
            tracing::debug!("telemetry disabled; selection report dropped");
            return;
        };
        // Detached on purpose; the UI never waits for delivery.
        let _handle = reporter.report_detached(user.to_owned(), case_key.to_owned());
    }
}
