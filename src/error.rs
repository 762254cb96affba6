//! Error types for store operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Every way a store, field or subscriber operation can fail.
///
/// Store, field and subscriber operations fail before any state is touched,
/// so their `Err` leaves the store as it was. `dispatch` is the exception:
/// by the time a reducer returns an error the `ACTION` event has been logged
/// and the reducer may already have called `set_state`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store was torn down with [`Store::destroy`](crate::Store::destroy).
    #[error("store has been destroyed")]
    Destroyed,

    /// `dispatch` was called with a type that has no registered reducer.
    #[error("action type \"{0}\" is undefined")]
    UnknownAction(String),

    /// An array helper was used on a field that does not hold an array.
    #[error("state field \"{field}\" is not an array")]
    NotAnArray { field: String },

    /// A numeric helper was used on a non-numeric field or operand.
    #[error("state field \"{field}\" is not a number")]
    NotANumber { field: String },

    /// A numeric helper produced a result that is not a finite number.
    #[error("arithmetic on state field \"{field}\" overflowed")]
    NumericOverflow { field: String },

    /// The subscriber was unsubscribed or never subscribed.
    #[error("subscriber is not listening")]
    NotListening,

    /// A typed read could not decode the field's value.
    #[error("state field \"{field}\" could not be decoded: {message}")]
    Decode { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_names_the_type() {
        let err = StoreError::UnknownAction("ADD_ITEM".to_string());
        assert_eq!(err.to_string(), "action type \"ADD_ITEM\" is undefined");
    }

    #[test]
    fn field_errors_name_the_field() {
        let err = StoreError::NotAnArray {
            field: "list".to_string(),
        };
        assert_eq!(err.to_string(), "state field \"list\" is not an array");
    }
}
