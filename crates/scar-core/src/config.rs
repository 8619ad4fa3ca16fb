use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Transfer knobs handed to the HTTP layer (derived from [`ScarConfig`]).
#[derive(Debug, Clone, Copy)]
pub struct TransferTuning {
    /// Receive buffer size, which bounds the chunk size delivered per write.
    pub chunk_size: usize,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Hard wall-clock cap on the whole GET transfer.
    pub transfer_timeout: Duration,
    /// Maximum number of redirects to follow.
    pub max_redirects: u32,
}

impl Default for TransferTuning {
    fn default() -> Self {
        ScarConfig::default().tuning()
    }
}

/// Global configuration loaded from `~/.config/scar/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScarConfig {
    /// Chunk size for the streamed GET, in bytes.
    pub chunk_size_bytes: usize,
    /// TCP connect timeout in seconds (HEAD and GET).
    pub connect_timeout_secs: u64,
    /// Hard timeout for the whole GET transfer in seconds.
    pub transfer_timeout_secs: u64,
    /// Maximum number of redirects to follow.
    pub max_redirects: u32,
}

impl Default for ScarConfig {
    fn default() -> Self {
        Self {
            chunk_size_bytes: 32 * 1024,
            connect_timeout_secs: 15,
            transfer_timeout_secs: 3600,
            max_redirects: 10,
        }
    }
}

impl ScarConfig {
    /// Projection consumed by `fetch_head` and `downloader`.
    pub fn tuning(&self) -> TransferTuning {
        TransferTuning {
            chunk_size: self.chunk_size_bytes,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            transfer_timeout: Duration::from_secs(self.transfer_timeout_secs),
            max_redirects: self.max_redirects,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("scar")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScarConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ScarConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ScarConfig = toml::from_str(&data)?;
    Ok(cfg)
}
