// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client as HttpClient;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

/// Form field identifiers the collection endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFields {
    pub user: String,
    pub case_key: String,
    pub timestamp: String,
}

impl Default for ReportFields {
    fn default() -> Self {
        Self {
            user: "entry.user".to_owned(),
            case_key: "entry.caso".to_owned(),
            timestamp: "entry.timestamp".to_owned(),
        }
    }
}

/// Best-effort reporter for card selections. Submissions run on detached
/// threads; the UI never observes their outcome.
#[derive(Debug, Clone)]
pub struct Reporter {
    endpoint: Url,
    fields: ReportFields,
    http: HttpClient,
}

impl Reporter {
    pub fn new(endpoint: &str, fields: ReportFields, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            bail!("telemetry.endpoint must not be empty");
        }
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("telemetry.endpoint {endpoint:?} is not a valid URL"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!("telemetry.endpoint must use http or https");
        }
        for (name, value) in [
            ("user", &fields.user),
            ("case", &fields.case_key),
            ("timestamp", &fields.timestamp),
        ] {
            if value.trim().is_empty() {
                bail!("telemetry {name} field identifier must not be empty");
            }
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            fields,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// One synchronous submission. The response body is never inspected;
    /// only a non-success status line turns into an error.
    pub fn report(&self, user: &str, case_key: &str) -> Result<()> {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("format timestamp")?;
        let form = [
            (self.fields.user.as_str(), user),
            (self.fields.case_key.as_str(), case_key),
            (self.fields.timestamp.as_str(), timestamp.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .map_err(|error| {
                anyhow!(
                    "cannot reach telemetry endpoint {}: {error} -- check the URL and your network connection",
                    self.endpoint
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            bail!("telemetry endpoint returned {status}");
        }
        Ok(())
    }

    /// Fire-and-forget submission on a detached thread. Failures are logged
    /// and swallowed; callers must not wait on the returned handle from the
    /// rendering path.
    pub fn report_detached(&self, user: String, case_key: String) -> JoinHandle<()> {
        let reporter = self.clone();
        thread::spawn(move || {
            if let Err(error) = reporter.report(&user, &case_key) {
                tracing::warn!("telemetry submission failed: {error:#}");
            }
        })
    }
}
