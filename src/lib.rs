//! Resilient façade over the public employee directory REST API.

pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::DirectoryConfig;
pub use directory::{Employee, EmployeeDirectory};
pub use error::{ApiError, DirectoryError, DirectoryResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
