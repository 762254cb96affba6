//! # Fieldcan
//!
//! A mutable key-value state store with field-granular change notification.
//!
//! Observers subscribe to the fields they care about and are only called
//! when one of those fields is written. Every mutation also flows through a
//! middleware pipeline, so logging, persistence and replay see a uniform
//! event stream.
//!
//! ## Store (core)
//!
//! - `Store` - the state snapshot, listener index, middlewares and reducers
//! - `Subscriber` - a revocable registration for a set of fields
//! - `StateField` - accessor for one field, with array and number helpers
//! - `dispatch`/`register` - optional action/reducer layer on top of `set_state`
//!
//! ## Extras
//!
//! - [`middleware`] - a `tracing` logger and a recording/replay middleware
//! - [`binding`] - ties a subscription to an observer's lifetime
//!
//! # Example
//!
//! ```
//! use fieldcan::{Action, Store};
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! let store = Store::default();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! let _sub = store
//!     .subscribe(["count"], move |store, _fields| {
//!         let count = store.field("count").get().unwrap();
//!         seen_clone.lock().unwrap().push(count);
//!     })
//!     .unwrap();
//!
//! store
//!     .register("INCREMENT", |store, _action| {
//!         store.field("count").add(1)?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! store.field("count").set(0).unwrap();
//! store.dispatch(Action::new("INCREMENT")).unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), vec![json!(0), json!(1)]);
//! ```

pub mod binding;
pub mod error;
pub mod middleware;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use store::{
    create_store, Action, Listener, LogInfo, Middleware, Reducer, State, StateField, Store,
    Subscriber, ALL_FIELDS,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::default();
        store.field("n").set(10).unwrap();
        assert_eq!(
            store.field("n").add(5).unwrap().sub(2).unwrap().get().unwrap(),
            json!(13)
        );
    }
}
