// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use casovista_app::{AppState, SearchMode};
use casovista_db::Store;
use casovista_sheet::{load_rows, normalize};
use casovista_telemetry::Reporter;
use config::Config;
use runtime::CliRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `casovista --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = config.db_path()?;
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let log_path = db_path.with_file_name("casovista.log");
    logging::init(&log_path)?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or CASOVISTA_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;

    let source = config.data_source()?;
    let fetch_timeout = config.fetch_timeout()?;

    let reporter = if config.telemetry_enabled() && !config.telemetry_endpoint().is_empty() {
        Some(
            Reporter::new(
                config.telemetry_endpoint(),
                config.telemetry_fields(),
                config.telemetry_timeout()?,
            )
            .with_context(|| {
                format!(
                    "invalid [telemetry] config in {}; fix endpoint/field/timeout values",
                    options.config_path.display()
                )
            })?,
        )
    } else {
        None
    };

    if options.check_only {
        let rows = load_rows(&source, fetch_timeout)
            .with_context(|| format!("load workbook from {}", source.describe()))?;
        let dataset = normalize(&rows)?;
        println!(
            "ok: {} casos from {}, database {}",
            dataset.len(),
            source.describe(),
            db_path.display()
        );
        return Ok(());
    }

    let mut state = AppState::default();
    if config.fuzzy_default() {
        state.mode = SearchMode::Fuzzy;
    }

    let mut runtime = CliRuntime::new(&store, source, fetch_timeout, reporter);
    casovista_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-db-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("casovista");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-db-path          Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + DB + workbook without the TUI");
    println!("  --help                   Show this help");
}
