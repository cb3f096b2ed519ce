pub mod common;
pub mod processing;
pub mod server;

pub use common::config::IngestConfig;
pub use common::messages::{AckCommand, CommandEnvelope, UploadRequest};
pub use server::{router, IngestService};
