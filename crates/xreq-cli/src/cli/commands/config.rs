//! `xreq config` – show where the config lives and what it says.

use anyhow::Result;
use xreq_core::config::{self, XreqConfig};

pub fn run_config(cfg: &XreqConfig) -> Result<()> {
    println!("Config file: {}", config::config_path()?.display());
    println!("{:<22} {}", "connect_timeout_secs", cfg.connect_timeout_secs);
    println!("{:<22} {}", "default_timeout_ms", cfg.default_timeout_ms);
    println!("{:<22} {}", "follow_redirects", cfg.follow_redirects);
    println!("{:<22} {}", "max_redirections", cfg.max_redirections);
    println!(
        "{:<22} {}",
        "user_agent",
        cfg.user_agent.as_deref().unwrap_or("-")
    );
    println!("{:<22} {}", "verbose", cfg.verbose);
    Ok(())
}
