//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI / environment overrides (mode, bind address, src_dir)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → active Profile selected by Mode
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; rules live for the whole process
//! - All fields have defaults to allow running without a file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError, Overrides};
pub use schema::{
    ListenerConfig, LogFormat, Mode, ObservabilityConfig, Profile, ProxyConfig, RouteConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
