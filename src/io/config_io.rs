use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Read `<data_dir>/config.toml`. A missing file yields the defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

/// Like `read_config`, but a broken file is reported and replaced by the
/// defaults
pub fn load_config(data_dir: &Path) -> AppConfig {
    read_config(data_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default configuration");
        AppConfig::default()
    })
}

// ---------------------------------------------------------------------------
// Data directory
// ---------------------------------------------------------------------------

/// Resolve the data directory: explicit flag, then `$IBADAH_HOME`, then
/// `$XDG_DATA_HOME/ibadah`, then `~/.local/share/ibadah`
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_data_dir(
        explicit,
        std::env::var("IBADAH_HOME").ok(),
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_data_dir(
    explicit: Option<&Path>,
    ibadah_home: Option<String>,
    xdg_data_home: Option<String>,
    home: Option<String>,
) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = ibadah_home.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    let data_home = xdg_data_home
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            home.map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/"))
                .join(".local")
                .join("share")
        });
    data_home.join("ibadah")
}
