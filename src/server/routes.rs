//! # HTTP and WebSocket Routes
//!
//! | Method | Path            | Handler                 |
//! |--------|-----------------|-------------------------|
//! | GET    | `/`             | `health_check`          |
//! | POST   | `/uploadBase64` | `upload_base64_handler` |
//! | POST   | `/upload`       | `upload_form_handler`   |
//! | GET    | `/ws`           | `ws_handler`            |

use axum::{
    extract::{multipart::Multipart, ws::WebSocketUpgrade, DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use log::warn;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::common::messages::{
    Base64Upload, CommandEnvelope, StatusMessage, Transport, UploadRequest,
};
use crate::processing::decode_image;
use crate::server::error::IngestError;
use crate::server::server::IngestService;
use crate::server::session::WsSession;

/// Build the application router around a shared service.
pub fn router(service: Arc<IngestService>) -> Router {
    // Upload routes carry their own body limit (other routes use the default)
    let upload_limit = match service.max_upload_bytes() {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };
    let upload_router: Router<Arc<IngestService>> = Router::new()
        .route("/uploadBase64", post(upload_base64_handler))
        .route("/upload", post(upload_form_handler))
        .layer(upload_limit);

    Router::new()
        .route("/", get(health_check))
        .route("/ws", get(ws_handler))
        .merge(upload_router)
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health_check() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Image upload server is running".to_string(),
    })
}

/// Accept `{"label"?, "image"}` where `image` is base64, optionally as a data URI.
async fn upload_base64_handler(
    State(service): State<Arc<IngestService>>,
    Json(payload): Json<Base64Upload>,
) -> Result<Json<CommandEnvelope>, IngestError> {
    let image = decode_image(&payload.image).map_err(|e| {
        warn!("⚠️ Rejected base64 upload: {}", e);
        IngestError::InvalidBase64
    })?;

    let request = UploadRequest::new(payload.label, image);
    Ok(Json(service.accept(request, Transport::Base64Json)))
}

/// Accept `multipart/form-data` with an optional `label` text field and a
/// required `image` file field.
async fn upload_form_handler(
    State(service): State<Arc<IngestService>>,
    mut multipart: Multipart,
) -> Result<Json<CommandEnvelope>, IngestError> {
    let mut label: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    // Parse multipart form data
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("⚠️ Failed to read multipart data: {}", e);
        IngestError::UnreadableUpload
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let data = field.bytes().await.map_err(|e| {
                    warn!("⚠️ Failed to read image data: {}", e);
                    IngestError::UnreadableUpload
                })?;
                image = Some(data.to_vec());
            }
            "label" => {
                let text = field.text().await.map_err(|e| {
                    warn!("⚠️ Failed to read label field: {}", e);
                    IngestError::UnreadableUpload
                })?;
                label = Some(text);
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| {
        warn!("⚠️ Multipart upload without an image field");
        IngestError::MissingImage
    })?;

    let request = UploadRequest::new(label, image);
    Ok(Json(service.accept(request, Transport::Multipart)))
}

/// WebSocket upgrade handler
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<Arc<IngestService>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let (outgoing, incoming) = socket.split();
        WsSession::new(service).run(incoming, outgoing).await;
    })
}
