// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use casovista_telemetry::{ReportFields, Reporter};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Response, Server};

#[test]
fn report_posts_a_form_encoded_body() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/collect", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method().as_str(), "POST");

        let form_encoded = request.headers().iter().any(|header| {
            header.field.as_str().as_str().eq_ignore_ascii_case("content-type")
                && header
                    .value
                    .as_str()
                    .contains("application/x-www-form-urlencoded")
        });
        assert!(form_encoded, "submission should be form encoded");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read body");
        assert!(body.contains("entry.user="));
        assert!(body.contains("ACME-100"));
        assert!(body.contains("entry.timestamp="));

        request
            .respond(Response::from_string("ok"))
            .expect("response should succeed");
    });

    let reporter = Reporter::new(&url, ReportFields::default(), Duration::from_secs(1))?;
    reporter.report("Jordan", "ACME-100")?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn empty_user_still_reports_the_case_key() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/collect", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read body");
        assert!(body.contains("entry.user=&") || body.ends_with("entry.user="));
        assert!(body.contains("ACME-100"));
        request
            .respond(Response::from_string("ok"))
            .expect("response should succeed");
    });

    let reporter = Reporter::new(&url, ReportFields::default(), Duration::from_secs(1))?;
    reporter.report("", "ACME-100")?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn non_success_status_is_an_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/collect", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(Response::from_string("nope").with_status_code(500))
            .expect("response should succeed");
    });

    let reporter = Reporter::new(&url, ReportFields::default(), Duration::from_secs(1))?;
    let error = reporter
        .report("Jordan", "ACME-100")
        .expect_err("500 should fail");
    assert!(error.to_string().contains("500"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn detached_reports_swallow_failures() -> Result<()> {
    let reporter = Reporter::new(
        "http://127.0.0.1:1/collect",
        ReportFields::default(),
        Duration::from_millis(50),
    )?;

    let handle = reporter.report_detached("Jordan".to_owned(), "ACME-100".to_owned());
    handle.join().expect("detached report must not panic");
    Ok(())
}
