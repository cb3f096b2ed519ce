//! # Image Handling
//!
//! Everything that happens to an image between the transport and the reply:
//! base64 extraction, the processing hook, and the acknowledgment command.

pub mod command;
pub mod decode;
pub mod hook;

// Re-export main functions for convenience
pub use command::make_control_command;
pub use decode::{decode_image, strip_data_uri};
pub use hook::{ImageProcessor, PassThrough};
