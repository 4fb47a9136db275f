use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Transport configuration loaded from `~/.config/xreq/config.toml`.
///
/// Only the transport reads it; option and header semantics are fixed per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XreqConfig {
    /// Seconds allowed for connection setup (DNS, TCP, TLS).
    pub connect_timeout_secs: u64,
    /// Whole-transfer limit in milliseconds when the `timeout` option is absent (0 = no limit).
    pub default_timeout_ms: u64,
    /// Follow `Location` redirects.
    pub follow_redirects: bool,
    /// Maximum redirects followed before the transfer fails.
    pub max_redirections: u32,
    /// `User-Agent` sent when the headers document does not supply one.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// libcurl verbose output (goes to stderr).
    #[serde(default)]
    pub verbose: bool,
}

impl Default for XreqConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            default_timeout_ms: 100_000,
            follow_redirects: true,
            max_redirections: 50,
            user_agent: None,
            verbose: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xreq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<XreqConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<XreqConfig> {
    if !path.exists() {
        let default_cfg = XreqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: XreqConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
