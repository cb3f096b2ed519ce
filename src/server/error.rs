use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::common::messages::ErrorResponse;

/// Rejections produced by the HTTP upload handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestError {
    /// `image` on `/uploadBase64` is not valid base64
    InvalidBase64,
    /// The multipart body or its file part could not be read
    UnreadableUpload,
    /// The multipart form has no `image` part
    MissingImage,
}

impl IngestError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::InvalidBase64 => StatusCode::BAD_REQUEST,
            IngestError::UnreadableUpload => StatusCode::INTERNAL_SERVER_ERROR,
            IngestError::MissingImage => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IngestError::InvalidBase64 => "Invalid base64 image",
            IngestError::UnreadableUpload => "Failed to read uploaded file",
            IngestError::MissingImage => "Missing 'image' file field",
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for IngestError {}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.message()))).into_response()
    }
}

/// Rejections sent back as error frames on `/ws`. The connection stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Not JSON, not an object, or the image failed to decode
    Malformed,
    /// A JSON object whose `image` is missing or not a string
    ImageNotString,
}

impl FrameError {
    pub fn message(&self) -> &'static str {
        match self {
            FrameError::Malformed => "Malformed JSON or base64 decode error",
            FrameError::ImageNotString => "Invalid message format: 'image' must be base64 string",
        }
    }

    pub fn to_response(self) -> ErrorResponse {
        ErrorResponse::new(self.message())
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FrameError {}
