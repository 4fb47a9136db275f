//! CLI for xreq.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use xreq_core::config::{self, XreqConfig};

use commands::{run_config, run_send, SendArgs};

/// Top-level CLI for xreq.
#[derive(Debug, Parser)]
#[command(name = "xreq")]
#[command(about = "xreq: HTTP requests configured by XML documents, answered with one", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send one request and print the response document.
    Send {
        /// HTTP method (GET, POST, PUT, ...). Case-insensitive.
        method: String,

        /// Absolute http:// or https:// URL.
        url: String,

        /// Form-encoded parameters: query string for GET, request body otherwise.
        #[arg(long, short = 'p', value_name = "PARAMS")]
        params: Option<String>,

        /// Headers document, inline or `@path` to read it from a file.
        #[arg(long = "headers", short = 'H', value_name = "XML")]
        headers_xml: Option<String>,

        /// Options document, inline or `@path` to read it from a file.
        #[arg(long = "options", short = 'o', value_name = "XML")]
        options_xml: Option<String>,

        /// Print the document as JSON instead of XML.
        #[arg(long)]
        json: bool,
    },

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(config::load_or_init());
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Send {
                method,
                url,
                params,
                headers_xml,
                options_xml,
                json,
            } => {
                let args = SendArgs {
                    method,
                    url,
                    params,
                    headers_xml,
                    options_xml,
                    json,
                };
                run_send(&cfg, args).await?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

/// A config that cannot be loaded or created falls back to defaults, with a warning.
pub(crate) fn load_config(loaded: Result<XreqConfig>) -> XreqConfig {
    loaded.unwrap_or_else(|err| {
        tracing::warn!("config unavailable, using defaults: {:#}", err);
        XreqConfig::default()
    })
}

#[cfg(test)]
mod tests;
