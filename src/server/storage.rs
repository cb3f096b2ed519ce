//! # Image Persistence
//!
//! Best-effort dump of received images to disk.
//!
//! Each image becomes `<directory>/<YYYYMMDDTHHMMSSZ>[_<label>].jpg`. Names
//! only have one-second resolution, so two images with the same label in the
//! same second overwrite each other. Writes run as detached tokio tasks: the
//! caller never waits for them, and failures only reach the log.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, error};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

use crate::common::config::StorageConfig;

/// Writes images under a fixed directory when enabled; does nothing otherwise.
#[derive(Debug, Clone)]
pub struct StorageSink {
    enabled: bool,
    directory: PathBuf,
}

impl StorageSink {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            enabled: config.store_images,
            directory: config.directory.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the storage directory if storage is enabled.
    pub fn prepare(&self) -> Result<()> {
        if self.enabled {
            std::fs::create_dir_all(&self.directory).with_context(|| {
                format!("creating storage directory {}", self.directory.display())
            })?;
        }
        Ok(())
    }

    /// Write `image` to a timestamped file.
    ///
    /// # Returns
    /// - `Ok(Some(path))`: file written
    /// - `Ok(None)`: storage disabled, nothing written
    /// - `Err`: the write failed
    pub async fn save_image(&self, image: &[u8], label: Option<&str>) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.directory.join(file_name(Utc::now(), label));
        tokio::fs::write(&path, image)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        Ok(Some(path))
    }

    /// Fire-and-forget [`save_image`](Self::save_image).
    ///
    /// The returned handle may be dropped; the write still completes in the
    /// background. Errors are logged and otherwise discarded.
    pub fn schedule(&self, image: Vec<u8>, label: Option<String>) -> JoinHandle<()> {
        let sink = self.clone();
        tokio::spawn(async move {
            match sink.save_image(&image, label.as_deref()).await {
                Ok(Some(path)) => debug!("💾 Stored {} bytes at {}", image.len(), path.display()),
                Ok(None) => {}
                Err(e) => error!("❌ Failed to store image: {:#}", e),
            }
        })
    }
}

/// `YYYYMMDDTHHMMSSZ` plus `_<label>` when a non-empty label is given.
///
/// The label is used verbatim: one containing `/` or `..` can name a path
/// outside the storage directory.
pub fn file_name(at: DateTime<Utc>, label: Option<&str>) -> String {
    let timestamp = at.format("%Y%m%dT%H%M%SZ");
    match label.filter(|l| !l.is_empty()) {
        Some(label) => format!("{}_{}.jpg", timestamp, label),
        None => format!("{}.jpg", timestamp),
    }
}
