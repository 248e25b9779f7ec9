//! Service configuration resolution
//!
//! Priority order, highest first:
//! 1. Command-line argument
//! 2. Environment variable (`TUSSIS_MODEL_DIR`, `TUSSIS_PORT`)
//! 3. TOML config file (`~/.config/tussis/config.toml`)
//! 4. Compiled default (`./model`, port 8000)

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

pub const MODEL_DIR_ENV: &str = "TUSSIS_MODEL_DIR";
pub const PORT_ENV: &str = "TUSSIS_PORT";

pub const DEFAULT_MODEL_DIR: &str = "./model";
pub const DEFAULT_PORT: u16 = 8000;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the three trained model artifacts
    pub model_dir: PathBuf,
    /// Port to listen on
    pub port: u16,
}

/// On-disk config file shape
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    model_dir: Option<PathBuf>,
    port: Option<u16>,
}

impl ServiceConfig {
    /// Resolve configuration from command-line values, environment
    /// variables, the config file, and compiled defaults, in that order.
    pub fn resolve(cli_model_dir: Option<PathBuf>, cli_port: Option<u16>) -> Self {
        let file = load_config_file().unwrap_or_default();

        let mut model_dir_sources: Vec<(&'static str, PathBuf)> = Vec::new();
        if let Some(dir) = cli_model_dir {
            model_dir_sources.push(("command line", dir));
        }
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            model_dir_sources.push(("environment", PathBuf::from(dir)));
        }
        if let Some(dir) = file.model_dir {
            model_dir_sources.push(("config file", dir));
        }

        let mut port_sources: Vec<(&'static str, u16)> = Vec::new();
        if let Some(port) = cli_port {
            port_sources.push(("command line", port));
        }
        if let Ok(raw) = std::env::var(PORT_ENV) {
            match raw.parse::<u16>() {
                Ok(port) => port_sources.push(("environment", port)),
                Err(_) => warn!("{PORT_ENV}={raw} is not a valid port, ignoring"),
            }
        }
        if let Some(port) = file.port {
            port_sources.push(("config file", port));
        }

        Self {
            model_dir: pick("model directory", model_dir_sources)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR)),
            port: pick("port", port_sources).unwrap_or(DEFAULT_PORT),
        }
    }
}

/// Highest-priority source wins. More than one configured source logs a
/// warning naming all of them and the winner.
fn pick<T>(setting: &str, sources: Vec<(&'static str, T)>) -> Option<T> {
    if sources.len() > 1 {
        let names: Vec<&str> = sources.iter().map(|(name, _)| *name).collect();
        warn!(
            "{setting} configured by multiple sources ({}); using the {} value",
            names.join(", "),
            names[0]
        );
    }
    sources.into_iter().next().map(|(_, value)| value)
}

fn load_config_file() -> Option<ConfigFile> {
    let path = config_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&contents) {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("Ignoring malformed config file {}: {e}", path.display());
            None
        }
    }
}

/// `~/.config/tussis/config.toml`, falling back to `/etc/tussis/config.toml`
/// for system-wide installs on Linux.
fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("tussis").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/tussis/config.toml");
    if cfg!(target_os = "linux") && system_config.exists() {
        return Some(system_config);
    }

    None
}
