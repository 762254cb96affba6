use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A state snapshot or patch: field name to value, in insertion order.
pub type State = Map<String, Value>;

pub const LOG_TYPE_ACTION: &str = "ACTION";
pub const LOG_TYPE_SET_STATE: &str = "SET_STATE";
pub const LOG_TYPE_STATE_CHANGE: &str = "STATE_CHANGE";
pub const LOG_TYPE_CURRENT_STATE: &str = "CURRENT_STATE";

/// An event passed to every middleware.
///
/// Serializes as `{ "type": ..., "payload": ... }`:
///
/// ```
/// use fieldcan::{LogInfo, State};
/// use serde_json::json;
///
/// let event = LogInfo::SetState { state: State::new() };
/// assert_eq!(
///     serde_json::to_value(&event).unwrap(),
///     json!({ "type": "SET_STATE", "payload": { "state": {} } })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogInfo {
    /// Snapshot handed to a middleware once, when it is registered.
    CurrentState { state: State },
    /// A dispatched action, unmodified.
    Action(Action),
    /// The raw patch passed to `set_state`, before the merge.
    SetState { state: State },
    /// The raw patch together with the snapshot it produced.
    StateChange {
        state: State,
        #[serde(rename = "newState")]
        new_state: State,
    },
}

impl LogInfo {
    /// The wire name of this event's type.
    pub fn kind(&self) -> &'static str {
        match self {
            LogInfo::CurrentState { .. } => LOG_TYPE_CURRENT_STATE,
            LogInfo::Action(_) => LOG_TYPE_ACTION,
            LogInfo::SetState { .. } => LOG_TYPE_SET_STATE,
            LogInfo::StateChange { .. } => LOG_TYPE_STATE_CHANGE,
        }
    }
}

/// A command for `Store::dispatch`: a type name plus arbitrary payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub payload: State,
}

impl Action {
    /// Create an action with an empty payload.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: State::new(),
        }
    }

    /// Add a payload field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Read a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_flattens_payload() {
        let action = Action::new("ADD_ITEM").with("text", "milk").with("index", 2);

        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "type": "ADD_ITEM", "text": "milk", "index": 2 })
        );

        let parsed: Action =
            serde_json::from_value(json!({ "type": "REMOVE", "index": 0 })).unwrap();
        assert_eq!(parsed.action_type, "REMOVE");
        assert_eq!(parsed.get("index"), Some(&json!(0)));
    }

    #[test]
    fn state_change_uses_new_state_key() {
        let mut patch = State::new();
        patch.insert("a".to_string(), json!(1));
        let mut snapshot = patch.clone();
        snapshot.insert("b".to_string(), json!(2));

        let event = LogInfo::StateChange {
            state: patch,
            new_state: snapshot,
        };

        assert_eq!(event.kind(), LOG_TYPE_STATE_CHANGE);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "STATE_CHANGE",
                "payload": { "state": { "a": 1 }, "newState": { "a": 1, "b": 2 } }
            })
        );
    }

    #[test]
    fn action_event_carries_action_as_payload() {
        let event = LogInfo::Action(Action::new("RESET"));
        assert_eq!(event.kind(), LOG_TYPE_ACTION);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "type": "ACTION", "payload": { "type": "RESET" } })
        );
    }
}
