//! Development proxy library.
//!
//! Forwards configured paths (API, docs, OpenAPI schema) to a local backend
//! while in development mode and serves the application source directory for
//! everything else.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{Mode, ProxyConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::Router;
