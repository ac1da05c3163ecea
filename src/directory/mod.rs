//! Employee directory: the resilient aggregation service over the upstream
//! employee API.
//!
//! # Data Flow
//! ```text
//! caller
//!     → validation.rs (fail fast, no network)
//!     → cache.rs (view lookup)
//!     → RetryPolicy(UpstreamClient)
//!     → envelope validation
//!     → derived view (filter, max, top ten)
//!     → cache.rs (store under the captured generation)
//!     → caller
//! ```

pub mod cache;
pub mod service;
pub mod types;
pub mod validation;

pub use cache::{CachedView, ViewCache, ViewKey};
pub use service::{EmployeeDirectory, TOP_EARNERS_LIMIT};
pub use types::{Confirmation, CreateEmployeeRequest, CreatedEmployee, Employee, NewEmployee};
