// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use casovista_sheet::{SheetSource, load_rows};
use std::thread;
use std::time::Duration;
use tiny_http::{Response, Server};

#[test]
fn unreachable_host_error_mentions_the_network() {
    let source = SheetSource::Url("http://127.0.0.1:1/data.xlsx".to_owned());
    let error = load_rows(&source, Duration::from_millis(50))
        .expect_err("unreachable host should fail");
    assert!(error.to_string().contains("network"));
}

#[test]
fn non_success_status_fails_the_load() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/data.xlsx", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(Response::from_string("gone").with_status_code(404))
            .expect("response should succeed");
    });

    let source = SheetSource::Url(url);
    let error = load_rows(&source, Duration::from_secs(1)).expect_err("404 should fail");
    assert!(error.to_string().contains("404"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_bypasses_caches_and_rejects_non_workbook_bodies() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/data.xlsx", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let no_store = request.headers().iter().any(|header| {
            header.field.as_str().as_str().eq_ignore_ascii_case("cache-control")
                && header.value.as_str().contains("no-store")
        });
        assert!(no_store, "fetch should send Cache-Control: no-store");
        request
            .respond(Response::from_string("<html>not a workbook</html>"))
            .expect("response should succeed");
    });

    let source = SheetSource::Url(url);
    let error =
        load_rows(&source, Duration::from_secs(1)).expect_err("html body should fail decode");
    assert!(format!("{error:#}").contains("open workbook"));

    handle.join().expect("server thread should join");
    Ok(())
}
