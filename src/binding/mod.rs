//! Lifecycle binding between a store and a long-lived observer.
//!
//! A view layer enters a [`Connection`] when its component comes alive and
//! exits it (or just drops it) when the component goes away.

mod connection;

pub use connection::{ConnectOptions, Connection};
