use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::{LogInfo, Middleware};

/// A middleware that records each event as a `tracing` debug event.
///
/// The event is emitted under the `fieldcan::log` target with its type in
/// `kind` and its JSON encoding in `event`.
pub fn logger() -> Middleware {
    Arc::new(|info: &LogInfo| match serde_json::to_string(info) {
        Ok(event) => debug!(target: "fieldcan::log", kind = info.kind(), %event, "store event"),
        Err(err) => warn!(target: "fieldcan::log", kind = info.kind(), %err, "cannot encode store event"),
    })
}
