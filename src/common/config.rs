//! # Configuration Utilities
//!
//! Configuration structures for the ingest service. Everything is read once
//! at startup and handed to [`IngestService`](crate::server::IngestService)
//! by value; nothing here is mutated afterwards.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: IngestConfig = load_config("config/server.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete service configuration.
///
/// Every section and key is optional; a missing file section falls back to
/// [`Default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerInfo,
    /// Image persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the HTTP/WebSocket listener binds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Socket address to listen on (e.g., "0.0.0.0:5000")
    #[serde(default = "default_address")]
    pub address: String,
    /// Request body cap for the HTTP upload routes, in bytes. Unset means
    /// no cap.
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            address: default_address(),
            max_upload_bytes: None,
        }
    }
}

/// Persistence toggle and target directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Write every received image to disk. Off by default.
    #[serde(default)]
    pub store_images: bool,
    /// Directory receiving `<YYYYMMDDTHHMMSSZ>[_<label>].jpg` files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_images: false,
            directory: default_directory(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from("received_images")
}
