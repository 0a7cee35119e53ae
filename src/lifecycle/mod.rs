//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast → server stops accepting → in-flight drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger()
//! ```
//!
//! # Design Decisions
//! - Fail fast at startup: any config error is fatal
//! - One broadcast channel shared by main and tests

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
