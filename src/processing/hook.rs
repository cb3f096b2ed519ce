//! Per-image processing hook.
//!
//! Runs on the request path for every accepted image, before the
//! acknowledgment is built. The default does nothing so that replies are not
//! delayed; validation or transcoding can be plugged in with
//! [`IngestService::with_processor`](crate::server::IngestService::with_processor).

/// Work performed on every received image.
///
/// Implementations must not fail: the acknowledgment is sent regardless.
pub trait ImageProcessor: Send + Sync {
    fn process(&self, image: &[u8]);
}

/// Leaves the image untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ImageProcessor for PassThrough {
    fn process(&self, _image: &[u8]) {}
}
