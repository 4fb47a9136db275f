//! Single entry point: five strings in, one `Response` document out.
//!
//! ```text
//! Start -> {OptionsParsed, HeadersMapped} -> RequestAssembled -> Sent
//!       -> ResponseReceived | ErrorResponseReceived | Failed
//! ```
//!
//! Nothing escapes [`execute`]: option/header/builder errors, transport
//! failures without a response, and panics all end in the exception document.

use anyhow::{anyhow, Context, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::document::Element;
use crate::error::RequestError;
use crate::headers::HeaderSet;
use crate::options::OptionSet;
use crate::request::{self, RequestInputs, RequestSpec};
use crate::serialize;
use crate::trace::ExecutionTrace;
use crate::transport::{Transport, TransportError};

/// Rendered when even the exception document cannot be rendered.
const LAST_RESORT_XML: &str = "<Response><Exception><Message>response document could not be rendered</Message><StackTrace/><Source>xreq</Source><FullDescription>response document could not be rendered</FullDescription></Exception></Response>";

/// Perform one request and describe its outcome.
pub fn execute(inputs: &RequestInputs, transport: &dyn Transport) -> Element {
    let mut trace = ExecutionTrace::new();
    trace.record_with("Starting", inputs.to_element());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(inputs, transport, &mut trace)))
        .unwrap_or_else(|payload| Err(anyhow!("panic while executing request: {}", panic_message(&*payload))));

    match outcome {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!("request ended in exception: {:#}", err);
            trace.record("General Exception Encountered. See Exception for more detail");
            serialize::exception_document(&trace, &err)
        }
    }
}

/// [`execute`] rendered as XML. Always returns a well-formed document.
pub fn execute_to_xml(inputs: &RequestInputs, transport: &dyn Transport) -> String {
    render_xml(&execute(inputs, transport))
}

/// Render `doc`; on failure render the failure itself, then a fixed document.
pub fn render_xml(doc: &Element) -> String {
    match doc.to_xml() {
        Ok(xml) => xml,
        Err(err) => {
            tracing::warn!("could not render response document: {:#}", err);
            let mut trace = ExecutionTrace::new();
            trace.record("Document Rendering Failed. See Exception for more detail");
            serialize::exception_document(&trace, &err)
                .to_xml()
                .unwrap_or_else(|_| LAST_RESORT_XML.to_string())
        }
    }
}

fn run(inputs: &RequestInputs, transport: &dyn Transport, trace: &mut ExecutionTrace) -> Result<Element> {
    let options = OptionSet::parse(inputs.options_xml.as_deref()).context("parse options")?;
    trace.record("Parsed Options");

    let headers = HeaderSet::parse(inputs.headers_xml.as_deref()).context("parse headers")?;
    let mapped = headers.map().context("map headers")?;
    trace.record("Processed Headers");

    let spec = RequestSpec::new(
        &inputs.method,
        &inputs.url,
        inputs.parameters.as_deref(),
        options,
        headers,
    );
    let outbound = request::build(&spec, mapped, trace).context("build request")?;

    trace.record("About to Send Request");
    match transport.send(&outbound) {
        Ok(response) => {
            trace.record("Retrieved Response");
            serialize::success_document(&response, &spec.options, trace).context("serialize response")
        }
        Err(TransportError::Http(response)) => {
            tracing::warn!(status = response.status, url = %outbound.url, "HTTP error response");
            trace.record("HTTP Error Response Encountered. See Response for more detail");
            Ok(serialize::error_response_document(&response, trace))
        }
        Err(TransportError::Failure(e)) => {
            // No response to describe: hand it to the exception path.
            Err(RequestError::HttpTransportFailure(e)).with_context(|| format!("{} {}", outbound.method, outbound.url))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
