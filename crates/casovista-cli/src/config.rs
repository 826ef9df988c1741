// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use casovista_sheet::SheetSource;
use casovista_telemetry::ReportFields;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SOURCE_FILE: &str = "data.xlsx";
const DEFAULT_FETCH_TIMEOUT: &str = "10s";
const DEFAULT_TELEMETRY_TIMEOUT: &str = "5s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub telemetry: Telemetry,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            telemetry: Telemetry::default(),
            storage: Storage::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub source: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Telemetry {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub user_field: Option<String>,
    pub case_field: Option<String>,
    pub timestamp_field: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Telemetry {
    fn default() -> Self {
        let fields = ReportFields::default();
        Self {
            enabled: Some(true),
            endpoint: Some(String::new()),
            user_field: Some(fields.user),
            case_field: Some(fields.case_key),
            timestamp_field: Some(fields.timestamp),
            timeout: Some(DEFAULT_TELEMETRY_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub fuzzy: Option<bool>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CASOVISTA_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CASOVISTA_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(casovista_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and place values under [data], [telemetry], [storage], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            casovista_db::validate_db_path(db_path)?;
        }

        for (name, timeout) in [
            ("data.timeout", &self.data.timeout),
            ("telemetry.timeout", &self.telemetry.timeout),
        ] {
            if let Some(raw) = timeout {
                let parsed = parse_duration(raw)?;
                if parsed <= Duration::ZERO {
                    bail!(
                        "{name} in {} must be positive, got {raw}",
                        path.display()
                    );
                }
            }
        }

        Ok(())
    }

    /// The workbook source: the configured path or URL, else `data.xlsx`
    /// inside the data directory.
    pub fn data_source(&self) -> Result<SheetSource> {
        match self.data.source.as_deref().map(str::trim) {
            Some(spec) if !spec.is_empty() => Ok(SheetSource::parse(spec)),
            _ => Ok(SheetSource::Path(
                default_data_dir()?.join(DEFAULT_SOURCE_FILE),
            )),
        }
    }

    pub fn fetch_timeout(&self) -> Result<Duration> {
        parse_duration(self.data.timeout.as_deref().unwrap_or(DEFAULT_FETCH_TIMEOUT))
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => casovista_db::default_db_path(),
        }
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry.enabled.unwrap_or(true)
    }

    pub fn telemetry_endpoint(&self) -> &str {
        self.telemetry.endpoint.as_deref().unwrap_or("").trim()
    }

    pub fn telemetry_fields(&self) -> ReportFields {
        let defaults = ReportFields::default();
        ReportFields {
            user: self
                .telemetry
                .user_field
                .clone()
                .unwrap_or(defaults.user),
            case_key: self
                .telemetry
                .case_field
                .clone()
                .unwrap_or(defaults.case_key),
            timestamp: self
                .telemetry
                .timestamp_field
                .clone()
                .unwrap_or(defaults.timestamp),
        }
    }

    pub fn telemetry_timeout(&self) -> Result<Duration> {
        parse_duration(
            self.telemetry
                .timeout
                .as_deref()
                .unwrap_or(DEFAULT_TELEMETRY_TIMEOUT),
        )
    }

    pub fn fuzzy_default(&self) -> bool {
        self.ui.fuzzy.unwrap_or(false)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# casovista config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Path or http(s) URL of the case workbook. Default is data.xlsx in the\n# platform data dir (for example ~/.local/share/casovista/data.xlsx)\n# source = \"/absolute/path/to/data.xlsx\"\ntimeout = \"{}\"\n\n[telemetry]\nenabled = true\n# Leave empty to disable selection reporting\nendpoint = \"\"\nuser_field = \"entry.user\"\ncase_field = \"entry.caso\"\ntimestamp_field = \"entry.timestamp\"\ntimeout = \"{}\"\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/casovista/casovista.db)\n# db_path = \"/absolute/path/to/casovista.db\"\n\n[ui]\nfuzzy = false\n",
            path.display(),
            DEFAULT_FETCH_TIMEOUT,
            DEFAULT_TELEMETRY_TIMEOUT,
        )
    }
}

/// Directory the default workbook resolves against.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CASOVISTA_DATA_PATH") {
        return Ok(PathBuf::from(override_path));
    }
    let base = dirs::data_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CASOVISTA_DATA_PATH to the workbook directory")
    })?;
    Ok(base.join(casovista_db::APP_NAME))
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
