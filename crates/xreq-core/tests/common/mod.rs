#![allow(dead_code)]

pub mod echo_server;

use xreq_core::Element;

/// `Name` attribute of every `<Step>` under `<Debug>`.
pub fn step_names(doc: &Element) -> Vec<String> {
    doc.child("Debug")
        .map(|d| {
            d.children_named("Step")
                .filter_map(|s| s.attr("Name"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
