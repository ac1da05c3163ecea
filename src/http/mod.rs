//! Inbound HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, tracing, metrics, timeout)
//!     → request.rs (correlation ID extraction)
//!     → employees.rs (one handler per directory operation)
//!     → response.rs (DirectoryError → status code + ApiError body)
//!     → Send to client
//! ```

pub mod employees;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::ApiFailure;
pub use server::{AppState, HttpServer};
