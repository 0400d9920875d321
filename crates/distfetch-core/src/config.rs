use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative config file (read-only, never created).
pub const CONFIG_ENV: &str = "DISTFETCH_CONFIG";

/// Manifest path used when neither the config nor the command line names one.
pub const DEFAULT_MANIFEST: &str = "Manifest";

/// Transfer tuning for the curl-backed fetcher (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for connection setup.
    pub connect_timeout_secs: u64,
    /// Abort when the transfer stays below this many bytes per second...
    pub low_speed_limit: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Upper bound for a whole transfer in seconds; 0 disables the limit.
    pub timeout_secs: u64,
    /// Maximum number of redirects followed.
    pub max_redirections: u32,
    /// Custom User-Agent header; libcurl sends none when unset.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            timeout_secs: 3600,
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// Global configuration loaded from `~/.config/distfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistConfig {
    /// Manifest consulted for verification, relative to the working directory.
    pub manifest: PathBuf,
    /// Suppress per-checksum status lines.
    pub quiet: bool,
    /// Optional fetch tuning; if missing, built-in defaults are used.
    pub fetch: Option<FetchConfig>,
}

impl Default for DistConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            quiet: false,
            fetch: None,
        }
    }
}

impl DistConfig {
    /// Effective fetch settings (configured section or defaults).
    pub fn fetch_config(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("distfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<DistConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: DistConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
///
/// `DISTFETCH_CONFIG` takes precedence over the XDG location and must exist.
pub fn load_or_init() -> Result<DistConfig> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return load_from(Path::new(&path));
    }

    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DistConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}
