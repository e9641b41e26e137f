//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (route lookup)
//!     → matcher.rs (pattern capture, target substitution)
//!     → Return: upstream URI or no-match
//!
//! Route Compilation (at startup):
//!     RouteConfig[] of the active mode
//!     → Parse patterns and target templates
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (configuration order)

pub mod matcher;
pub mod router;

pub use matcher::{RouteError, RoutePattern, TargetTemplate, WILDCARD};
pub use router::{Route, RouteMatch, Router};
