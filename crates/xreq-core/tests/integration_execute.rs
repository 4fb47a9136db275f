//! Integration test: full executor runs against a local echo server over libcurl.
//!
//! The echo server returns the raw request as the body, so these tests assert
//! on what actually went over the wire.

mod common;

use base64::prelude::*;
use chrono::DateTime;
use common::echo_server;
use common::step_names;
use std::net::TcpListener;
use std::time::{Duration, Instant};
use xreq_core::{execute, execute_to_xml, CurlTransport, Element, RequestInputs};

fn run(inputs: RequestInputs) -> Element {
    execute(&inputs, &CurlTransport::default())
}

fn body(doc: &Element) -> &str {
    doc.child_text("Body").expect("success document has a body")
}

fn innermost_source(doc: &Element) -> String {
    let mut ex = doc.child("Exception").expect("exception document");
    while let Some(inner) = ex.child("InnerException").and_then(|i| i.child("Exception")) {
        ex = inner;
    }
    ex.child_text("Source").unwrap_or_default().to_string()
}

/// URL of a port that was bound and released, so nothing listens there.
fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

#[test]
fn get_parameters_go_into_the_query() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("GET", format!("{}/echo", base)).with_parameters("a=1&b=2"));

    assert!(body(&doc).starts_with("GET /echo?a=1&b=2 HTTP/1.1\r\n"), "{}", body(&doc));
    assert_eq!(doc.child_text("ResponseUri"), Some(format!("{}/echo?a=1&b=2", base).as_str()));
    assert_eq!(doc.child_text("Method"), Some("GET"));
    assert_eq!(doc.child_text("StatusNumber"), Some("200"));
    assert_eq!(doc.child_text("StatusCode"), Some("OK"));
    assert_eq!(doc.child_text("StatusDescription"), Some("OK"));
    assert_eq!(doc.child_text("ProtocolVersion"), Some("1.1"));
    assert_eq!(doc.child_text("Server"), Some(echo_server::SERVER_NAME));
    assert_eq!(doc.child_text("CharacterSet"), Some("utf-8"));
    assert_eq!(doc.child_text("CookiesCount"), Some("2"));
    assert_eq!(doc.child_text("LastModified"), Some("2015-10-21T07:28:00Z"));
    assert_eq!(doc.child_text("SupportsHeaders"), Some("true"));
    assert!(doc.child("Debug").is_none());
}

#[test]
fn get_parameters_extend_an_existing_query() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("get", format!("{}/echo?x=0", base)).with_parameters("a=1"));
    assert!(body(&doc).starts_with("GET /echo?x=0&a=1 HTTP/1.1\r\n"));
}

#[test]
fn response_headers_are_grouped_by_name() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("GET", format!("{}/echo", base)));
    let headers = doc.child("Headers").unwrap();
    let cookie = headers
        .children_named("Header")
        .find(|h| h.child_text("Name").is_some_and(|n| n.eq_ignore_ascii_case("Set-Cookie")))
        .unwrap();
    let values: Vec<_> = cookie
        .child("Values")
        .unwrap()
        .children_named("Value")
        .filter_map(|v| v.text.as_deref())
        .collect();
    assert_eq!(values, vec!["a=1; Path=/", "b=2; Path=/"]);
    assert_eq!(
        doc.child_text("HeadersCount"),
        Some(headers.children_named("Header").count().to_string().as_str())
    );
}

#[test]
fn post_parameters_become_a_form_body() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("POST", format!("{}/form", base)).with_parameters("a=1&b=2"));
    let echoed = body(&doc);
    assert!(echoed.starts_with("POST /form HTTP/1.1\r\n"));
    assert!(echoed.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
    assert!(echoed.contains("Content-Length: 7\r\n"));
    assert!(echoed.ends_with("\r\n\r\na=1&b=2"));
}

#[test]
fn other_verbs_carry_the_body_too() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("PUT", format!("{}/item", base)).with_parameters("k=v"));
    let echoed = body(&doc);
    assert!(echoed.starts_with("PUT /item HTTP/1.1\r\n"));
    assert!(echoed.ends_with("k=v"));
    assert_eq!(doc.child_text("Method"), Some("PUT"));
}

#[test]
fn reserved_headers_reach_the_wire() {
    let base = echo_server::start();
    let headers = r#"<Headers>
        <Header Name="Content-Type">text/plain</Header>
        <Header Name="User-Agent">xreq-test</Header>
        <Header Name="Referer">http://ref.example/</Header>
        <Header Name="Accept">text/plain</Header>
        <Header Name="Range">0-9</Header>
        <Header Name="If-Modified-Since">Mon, 01 Jan 2001 00:00:00 GMT</Header>
        <Header Name="X-Trace">abc</Header>
        <Header Name="X-Trace">def</Header>
    </Headers>"#;
    let doc = run(
        RequestInputs::new("POST", format!("{}/h", base))
            .with_parameters("a=1")
            .with_headers_xml(headers),
    );
    let echoed = body(&doc);
    assert!(echoed.contains("Content-Type: text/plain\r\n"), "{}", echoed);
    assert!(!echoed.contains("x-www-form-urlencoded"));
    assert!(echoed.contains("Content-Length: 3\r\n"));
    assert!(echoed.contains("User-Agent: xreq-test\r\n"));
    assert!(echoed.contains("Referer: http://ref.example/\r\n"));
    assert!(echoed.contains("Accept: text/plain\r\n"));
    assert!(echoed.contains("Range: bytes=0-9\r\n"));
    assert!(echoed.contains("If-Modified-Since: "));
    assert!(echoed.contains("X-Trace: abc\r\nX-Trace: def\r\n"));
}

#[test]
fn error_status_returns_reduced_document_with_trace() {
    let base = echo_server::start();
    for options in [None, Some("<Options><debug>false</debug></Options>")] {
        let mut inputs = RequestInputs::new("GET", format!("{}/status/404", base));
        if let Some(o) = options {
            inputs = inputs.with_options_xml(o);
        }
        let doc = run(inputs);
        assert_eq!(doc.child_text("StatusNumber"), Some("404"));
        assert_eq!(doc.child_text("StatusCode"), Some("NotFound"));
        assert_eq!(doc.child_text("StatusDescription"), Some("Not Found"));
        assert_eq!(doc.child_text("Server"), Some(echo_server::SERVER_NAME));
        assert!(doc.child("Body").is_none());
        assert!(doc.child("Headers").is_none());
        let names = step_names(&doc);
        assert_eq!(
            names.last().map(String::as_str),
            Some("HTTP Error Response Encountered. See Response for more detail")
        );
    }
}

#[test]
fn server_error_is_an_error_response() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("POST", format!("{}/status/503", base)));
    assert_eq!(doc.child_text("StatusNumber"), Some("503"));
    assert_eq!(doc.child_text("StatusCode"), Some("ServiceUnavailable"));
    assert!(doc.child("Debug").is_some());
}

#[test]
fn refused_connection_is_an_exception() {
    let doc = run(RequestInputs::new("GET", closed_port_url()));
    assert!(doc.child("StatusNumber").is_none());
    assert_eq!(innermost_source(&doc), "curl");
    let names = step_names(&doc);
    assert!(names.iter().any(|n| n == "About to Send Request"));
    assert_eq!(
        names.last().map(String::as_str),
        Some("General Exception Encountered. See Exception for more detail")
    );
}

#[test]
fn timeout_option_limits_the_transfer() {
    let base = echo_server::start();
    let doc = run(
        RequestInputs::new("GET", format!("{}/slow", base))
            .with_options_xml("<Options><timeout>200</timeout></Options>"),
    );
    assert!(doc.child("Exception").is_some());
    assert_eq!(innermost_source(&doc), "curl");
}

#[test]
fn base64_body_is_exact() {
    let base = echo_server::start();
    let doc = run(
        RequestInputs::new("GET", format!("{}/bytes", base)).with_options_xml(
            "<Options><convert_response_to_base64>True</convert_response_to_base64></Options>",
        ),
    );
    let decoded = BASE64_STANDARD.decode(body(&doc)).unwrap();
    assert_eq!(decoded, echo_server::BINARY_BODY);
    assert_eq!(doc.child_text("ContentLength"), Some("8"));
}

#[test]
fn gzip_is_decoded_unless_disabled() {
    let base = echo_server::start();
    let url = format!("{}/gzip", base);

    let doc = run(RequestInputs::new("GET", url.clone()));
    assert_eq!(body(&doc), echo_server::GZIP_TEXT);
    assert_eq!(doc.child_text("ContentEncoding"), Some("gzip"));

    let doc = run(RequestInputs::new("GET", url).with_options_xml(
        "<Options><auto_decompress>false</auto_decompress><convert_response_to_base64>true</convert_response_to_base64></Options>",
    ));
    let raw = BASE64_STANDARD.decode(body(&doc)).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);
}

#[test]
fn debug_trace_covers_every_phase_in_order() {
    let base = echo_server::start();
    let doc = run(
        RequestInputs::new("POST", format!("{}/echo", base))
            .with_parameters("a=1")
            .with_options_xml("<Options><debug>TRUE</debug></Options>"),
    );
    assert_eq!(
        step_names(&doc),
        vec![
            "Starting",
            "Parsed Options",
            "Processed Headers",
            "Handled Option 'security_protocol'",
            "Handled GET parameters",
            "Created request and set method",
            "Applied Headers",
            "Handled Option 'timeout'",
            "Handled Option 'auto_decompress'",
            "Handled non-GET Parameters",
            "About to Send Request",
            "Retrieved Response",
            "Processed Response Headers",
            "Handled Option 'convert_response_to_base64' and Retrieved Response Body",
            "Assembled Return Document",
        ]
    );

    let debug = doc.child("Debug").unwrap();
    let stamps: Vec<_> = debug
        .children_named("Step")
        .map(|s| DateTime::parse_from_rfc3339(s.attr("LoggedUtc").unwrap()).unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));

    let starting = debug.children_named("Step").next().unwrap();
    let echo = starting.child("InputParameters").unwrap();
    assert_eq!(echo.child_text("requestMethod"), Some("POST"));
    assert_eq!(echo.child_text("parameters"), Some("a=1"));
}

#[test]
fn unknown_security_protocol_is_an_exception() {
    let base = echo_server::start();
    let doc = run(
        RequestInputs::new("GET", format!("{}/echo", base))
            .with_options_xml("<Options><security_protocol>Tls99</security_protocol></Options>"),
    );
    let ex = doc.child("Exception").unwrap();
    assert!(ex.child_text("FullDescription").unwrap().contains("Tls99"));
}

#[test]
fn xml_rendering_of_a_live_response() {
    let base = echo_server::start();
    let xml = execute_to_xml(
        &RequestInputs::new("GET", format!("{}/status/200", base)),
        &CurlTransport::default(),
    );
    assert!(xml.starts_with("<Response>"));
    assert!(xml.contains("<StatusNumber>200</StatusNumber>"));
    assert!(xml.contains("<Body>status 200</Body>"));
    assert!(xml.ends_with("</Response>"));
}

#[test]
fn empty_header_values_reach_the_wire() {
    let base = echo_server::start();
    let headers = r#"<Headers><Header Name="X-Empty"></Header><Header Name="X-B">b</Header></Headers>"#;
    let doc = run(RequestInputs::new("GET", format!("{}/e", base)).with_headers_xml(headers));
    let echoed = body(&doc);
    assert!(echoed.contains("\r\nX-Empty:"), "{}", echoed);
    assert!(echoed.contains("X-B: b\r\n"));
}

#[test]
fn any_named_child_is_sent_as_a_header() {
    let base = echo_server::start();
    let headers = r#"<Headers><Header Name="X-A">1</Header><Extra Name="X-C">3</Extra><Header Name="X-B">2</Header></Headers>"#;
    let doc = run(RequestInputs::new("GET", format!("{}/e", base)).with_headers_xml(headers));
    assert!(body(&doc).contains("X-A: 1\r\nX-C: 3\r\nX-B: 2\r\n"), "{}", body(&doc));
}

#[test]
fn line_breaks_in_header_values_never_reach_the_wire() {
    let base = echo_server::start();
    let headers = r#"<Headers><Header Name="X-A">one&#13;&#10;X-Injected: evil</Header></Headers>"#;
    let doc = run(RequestInputs::new("GET", format!("{}/e", base)).with_headers_xml(headers));
    assert!(doc.child("Body").is_none());
    let ex = doc.child("Exception").unwrap();
    assert!(ex.child_text("FullDescription").unwrap().contains("X-A"));
    let names = step_names(&doc);
    assert!(!names.iter().any(|n| n == "About to Send Request"));
}

#[test]
fn head_with_parameters_fails_before_sending() {
    let base = echo_server::start();
    let started = Instant::now();
    let doc = run(RequestInputs::new("HEAD", format!("{}/echo", base)).with_parameters("a=1"));
    assert!(started.elapsed() < Duration::from_secs(2));
    let ex = doc.child("Exception").unwrap();
    assert!(ex.child_text("FullDescription").unwrap().contains("HEAD"));
}

#[test]
fn head_without_parameters_reads_no_body() {
    let base = echo_server::start();
    let doc = run(RequestInputs::new("HEAD", format!("{}/echo", base)));
    assert_eq!(doc.child_text("StatusNumber"), Some("200"));
    assert_eq!(doc.child_text("Method"), Some("HEAD"));
    assert_eq!(doc.child_text("Body"), Some(""));
}
