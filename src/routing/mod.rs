//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Stripped request path
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (evaluate path pattern)
//!     → Return: BackendId or NoRouteMatch
//!
//! Route construction (at startup):
//!     RouteRule[] in declaration order
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (exact, prefix and segment wildcards only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::{RouteRule, RouteTable};
