//! Execution trace: append-only, timestamped checkpoints of one call.
//!
//! Built before anything that can fail, so every outcome (response, HTTP error,
//! exception) can show how far processing got.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::document::Element;

#[derive(Debug, Clone)]
pub struct Step {
    pub name: String,
    pub logged_at: DateTime<Utc>,
    pub detail: Option<Element>,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionTrace {
    steps: Vec<Step>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str) {
        self.push(name, None);
    }

    pub fn record_with(&mut self, name: &str, detail: Element) {
        self.push(name, Some(detail));
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `<Debug>` element with one `<Step Name=".." LoggedUtc=".."/>` per checkpoint.
    pub fn to_element(&self) -> Element {
        let mut debug = Element::new("Debug");
        for step in &self.steps {
            let mut el = Element::new("Step")
                .with_attr("Name", step.name.as_str())
                .with_attr(
                    "LoggedUtc",
                    step.logged_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
                );
            if let Some(detail) = &step.detail {
                el.push(detail.clone());
            }
            debug.push(el);
        }
        debug
    }

    fn push(&mut self, name: &str, detail: Option<Element>) {
        let now = Utc::now();
        // Timestamps are strictly increasing even when the clock is coarse or steps back.
        let logged_at = match self.steps.last() {
            Some(last) if now <= last.logged_at => last.logged_at + Duration::nanoseconds(1),
            _ => now,
        };
        tracing::debug!(step = name, at = %logged_at, "trace step");
        self.steps.push(Step {
            name: name.to_string(),
            logged_at,
            detail,
        });
    }
}
