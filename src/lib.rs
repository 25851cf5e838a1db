//! eventbus - in-process publish/subscribe event bus
//!
//! Producers publish named events carrying opaque payloads, consumers
//! register handlers against event names, and a bounded pool of workers
//! running on Tokio delivers each event to its handlers asynchronously.
//!
//! ```rust
//! use eventbus::{Bus, HandlerResult, Payload};
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> eventbus::Result<()> {
//! let bus = Bus::with_options("users", 1, 10)?;
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let log = seen.clone();
//! bus.subscribe("created", move |payload: &Payload| -> HandlerResult {
//!     log.lock().unwrap().push(payload.clone());
//!     Ok(())
//! })?;
//!
//! bus.publish("created", r#"{"Message":"x"}"#)?;
//! bus.shutdown().await;
//!
//! assert_eq!(*seen.lock().unwrap(), vec![Payload::from(r#"{"Message":"x"}"#)]);
//! # Ok(())
//! # }
//! ```
//!
//! See `demos/created_deleted.rs` and `demos/parallel_workers.rs`.

mod bus;
mod bus_builder;
mod config;
mod envelope;
mod error;
mod event_name;
mod handler;
mod meta;
mod monitor;
mod payload;
mod registry;

pub mod monitors;
pub mod pool;

pub use bus::Bus;
pub use bus_builder::BusBuilder;
pub use config::Config;
pub use envelope::Envelope;
pub use error::{ArgumentError, Error, Rejection};
pub use event_name::EventName;
pub use handler::{BoxError, Handler, HandlerResult};
pub use meta::Meta;
pub use monitor::Monitor;
pub use payload::{NonEmpty, Payload, Validator};

#[cfg(feature = "serde")]
pub use payload::JsonValidator;

pub type Result<T = ()> = std::result::Result<T, Error>;
pub type EventId = u128;
