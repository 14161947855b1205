//! Engine configuration from TOML.
//!
//! ```toml
//! [engine]
//! memoize_cells = true
//! max_range_cells = 1000000
//! max_depth = 512
//! ```
//!
//! Every key is optional; missing keys keep the [`EngineConfig`] defaults.

use directories::ProjectDirs;
use serde::Deserialize;
use sheetcalc_engine::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, SheetError};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    engine: Option<EngineConfig>,
}

/// Default location of the user's config: `<config dir>/sheetcalc/engine.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("engine.toml");
    Some(path)
}

/// Parse config file text.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    Ok(file.engine.unwrap_or_default())
}

/// Read and parse a config file, failing on any problem.
pub fn load_config_file(path: &Path) -> Result<EngineConfig> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_CONFIG_FILE_BYTES {
        return Err(SheetError::Config {
            path: path.display().to_string(),
            message: format!(
                "file too large ({} bytes, max {})",
                size, MAX_CONFIG_FILE_BYTES
            ),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_config(&content).map_err(|err| SheetError::Config {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Load the engine config from `explicit`, or from the user config path.
///
/// Never fails: problems are returned as warnings and the defaults are used.
/// A missing user config is not a problem; a missing explicit file is.
pub fn load_config(explicit: Option<&Path>) -> (EngineConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (EngineConfig::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (EngineConfig::default(), warnings);
    }

    match load_config_file(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring engine config");
            warnings.push(err.to_string());
            (EngineConfig::default(), warnings)
        }
    }
}
