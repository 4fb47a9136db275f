//! `xreq send <method> <url>` – run one request through the executor.

use anyhow::{Context, Result};
use std::fs;
use xreq_core::config::XreqConfig;
use xreq_core::executor;
use xreq_core::{CurlTransport, RequestInputs};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendArgs {
    pub method: String,
    pub url: String,
    pub params: Option<String>,
    pub headers_xml: Option<String>,
    pub options_xml: Option<String>,
    pub json: bool,
}

/// `@path` reads the document from a file; anything else is the document itself.
pub(crate) fn resolve_document(arg: Option<String>) -> Result<Option<String>> {
    match arg {
        Some(a) => match a.strip_prefix('@') {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("read document {}", path))
                .map(Some),
            None => Ok(Some(a)),
        },
        None => Ok(None),
    }
}

pub(crate) fn build_inputs(args: SendArgs) -> Result<RequestInputs> {
    let mut inputs = RequestInputs::new(args.method, args.url);
    inputs.parameters = args.params;
    inputs.headers_xml = resolve_document(args.headers_xml)?;
    inputs.options_xml = resolve_document(args.options_xml)?;
    Ok(inputs)
}

/// Prints the response document. Request-level failures are part of the
/// document, so this only fails on CLI problems (unreadable `@file`, join error).
pub async fn run_send(cfg: &XreqConfig, args: SendArgs) -> Result<()> {
    let json = args.json;
    let inputs = build_inputs(args)?;
    let transport = CurlTransport::new(cfg);

    let rendered = tokio::task::spawn_blocking(move || {
        let doc = executor::execute(&inputs, &transport);
        if json {
            doc.to_json()
        } else {
            Ok(executor::render_xml(&doc))
        }
    })
    .await
    .context("request task join")??;

    println!("{}", rendered);
    Ok(())
}
