//! Exception records: an error and its whole chain of causes, as nested records.

use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;

use crate::document::Element;
use crate::error::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRecord {
    pub message: String,
    pub stack_trace: String,
    /// Component that raised this layer.
    pub source: String,
    /// This layer's message followed by every cause.
    pub full_description: String,
    pub inner: Option<Box<ExceptionRecord>>,
}

impl ExceptionRecord {
    /// One record per layer of `err.chain()`, outermost first. The outermost
    /// layer carries the backtrace when one was captured.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let layers: Vec<&(dyn StdError + 'static)> = err.chain().collect();
        let backtrace = err.backtrace();
        let stack_trace = if backtrace.status() == BacktraceStatus::Captured {
            backtrace.to_string()
        } else {
            String::new()
        };

        let mut inner: Option<Box<ExceptionRecord>> = None;
        for (depth, layer) in layers.iter().enumerate().rev() {
            let full_description = layers[depth..]
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(": ");
            inner = Some(Box::new(ExceptionRecord {
                message: layer.to_string(),
                stack_trace: if depth == 0 {
                    stack_trace.clone()
                } else {
                    String::new()
                },
                source: component_of(*layer).to_string(),
                full_description,
                inner,
            }));
        }
        match inner {
            Some(record) => *record,
            None => Self::message_only(err.to_string()),
        }
    }

    /// Record with no cause and no backtrace.
    pub fn message_only(message: String) -> Self {
        Self {
            full_description: message.clone(),
            message,
            stack_trace: String::new(),
            source: "xreq".to_string(),
            inner: None,
        }
    }

    /// Number of records in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut cur = self.inner.as_deref();
        while let Some(r) = cur {
            depth += 1;
            cur = r.inner.as_deref();
        }
        depth
    }

    /// `<Exception>` with `<InnerException><Exception>..` nested once per cause.
    pub fn to_element(&self) -> Element {
        let mut chain = Vec::new();
        let mut cur = Some(self);
        while let Some(r) = cur {
            chain.push(r);
            cur = r.inner.as_deref();
        }

        let mut nested: Option<Element> = None;
        for record in chain.into_iter().rev() {
            let mut el = Element::new("Exception")
                .with_child(Element::leaf("Message", &record.message))
                .with_child(Element::leaf("StackTrace", &record.stack_trace))
                .with_child(Element::leaf("Source", &record.source))
                .with_child(Element::leaf("FullDescription", &record.full_description));
            if let Some(inner) = nested.take() {
                el.push(Element::new("InnerException").with_child(inner));
            }
            nested = Some(el);
        }
        nested.unwrap_or_else(|| Element::new("Exception"))
    }
}

fn component_of(layer: &(dyn StdError + 'static)) -> &'static str {
    if let Some(e) = layer.downcast_ref::<RequestError>() {
        e.component()
    } else if layer.is::<curl::Error>() {
        "curl"
    } else if layer.is::<quick_xml::DeError>() {
        "xml"
    } else if layer.is::<std::io::Error>() {
        "io"
    } else {
        "xreq"
    }
}
