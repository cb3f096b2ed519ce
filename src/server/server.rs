//! # Ingest Service Core
//!
//! The transport-independent part of the server. Every entry point (JSON,
//! multipart, WebSocket) extracts image bytes and hands them to
//! [`IngestService::accept`], which runs the processing hook, schedules
//! persistence and builds the acknowledgment.
//!
//! Transport concerns (routing, extraction, error bodies) live in
//! [`routes`](super::routes) and [`session`](super::session).

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::common::config::IngestConfig;
use crate::common::messages::{CommandEnvelope, Transport, UploadRequest};
use crate::processing::{make_control_command, ImageProcessor, PassThrough};
use crate::server::storage::StorageSink;

/// Shared ingest pipeline.
///
/// Built once at startup from an immutable [`IngestConfig`] and shared
/// between handlers behind an `Arc`.
pub struct IngestService {
    storage: StorageSink,
    processor: Arc<dyn ImageProcessor>,
    max_upload_bytes: Option<usize>,
}

impl IngestService {
    /// Create the service, creating the storage directory when storage is on.
    ///
    /// # Errors
    /// Fails if the storage directory cannot be created.
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let storage = StorageSink::new(&config.storage);
        storage.prepare()?;

        if storage.is_enabled() {
            info!("💾 Storing images under {}", storage.directory().display());
        }

        Ok(Self {
            storage,
            processor: Arc::new(PassThrough),
            max_upload_bytes: config.server.max_upload_bytes,
        })
    }

    /// Replace the default pass-through processing hook.
    pub fn with_processor(mut self, processor: Arc<dyn ImageProcessor>) -> Self {
        self.processor = processor;
        self
    }

    pub fn storage(&self) -> &StorageSink {
        &self.storage
    }

    /// Body size cap for HTTP uploads; `None` lifts axum's 2 MB default.
    pub fn max_upload_bytes(&self) -> Option<usize> {
        self.max_upload_bytes
    }

    /// Run the pipeline for one decoded image and produce the reply.
    ///
    /// Must be called from within a tokio runtime: persistence is spawned
    /// onto it and not awaited.
    pub fn accept(&self, request: UploadRequest, transport: Transport) -> CommandEnvelope {
        let label = request.label().map(str::to_string);

        info!(
            "📥 Received image via {} ({} bytes, label: {})",
            transport,
            request.image.len(),
            label.as_deref().unwrap_or("-")
        );

        self.processor.process(&request.image);
        self.storage.schedule(request.image, label.clone());

        CommandEnvelope::now(make_control_command(label.as_deref()))
    }
}
