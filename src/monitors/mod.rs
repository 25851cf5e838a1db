//! Ready-to-use monitor implementations.
//!
//! # Available Monitors
//!
//! - [`Tracer`] - Logs the event lifecycle via `tracing` crate
//!
//! # Example
//!
//! ```ignore
//! use eventbus::{Bus, monitors::Tracer};
//!
//! let bus = Bus::builder("orders").monitor(Tracer).build()?;
//! ```

mod tracer;
pub use tracer::Tracer;
