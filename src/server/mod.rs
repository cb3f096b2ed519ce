pub mod error;
pub mod routes;
pub mod server;
pub mod session;
pub mod storage;

pub use error::{FrameError, IngestError};
pub use routes::router;
pub use server::IngestService;
pub use session::WsSession;
pub use storage::StorageSink;
