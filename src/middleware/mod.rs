//! Ready-made middlewares.
//!
//! - [`logger`] writes every store event to `tracing`
//! - [`Recorder`] keeps the event stream for inspection and replay

mod logger;
mod recorder;

pub use logger::logger;
pub use recorder::Recorder;
