//! # agk telemetry
//!
//! Structured logging for the scaffolding engine and its command-line
//! front-end, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust
//! use agk_telemetry::{generation_span, info, init_telemetry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("agk")?;
//!
//!     let span = generation_span("demo");
//!     let _enter = span.enter();
//!     info!("generating project");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use spans::*;

pub use init::{LogFormat, init_telemetry, init_telemetry_with_format};
