//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, access log, timeout)
//!     → [document routes] rate limit → middleware/access_control.rs (User-Agent)
//!     → handlers.rs / health probes
//!     → response.rs (ApiError → status + body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, PrettyJson};
pub use server::{AppState, HttpServer};
