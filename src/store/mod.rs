//! Key-value state store with field-granular subscriptions.
//!
//! A [`Store`] holds one state snapshot and routes every change through
//! `set_state`: middlewares log it, then listeners registered for the changed
//! fields (or for all fields) are notified. [`StateField`] and [`Subscriber`]
//! are thin handles over the store.

mod event;
mod field;
mod store;
mod subscriber;

pub use event::{
    Action, LogInfo, State, LOG_TYPE_ACTION, LOG_TYPE_CURRENT_STATE, LOG_TYPE_SET_STATE,
    LOG_TYPE_STATE_CHANGE,
};
pub use field::StateField;
pub use store::{create_store, Listener, Middleware, Reducer, Store, ALL_FIELDS};
pub use subscriber::Subscriber;
