//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing layer decides: proxy or local
//!     → headers.rs (strip hop-by-hop in both directions)
//!     → response.rs (map forwarding failures)
//!     → Send to client
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use response::ProxyError;
pub use server::{forward, AppState, HttpServer};
