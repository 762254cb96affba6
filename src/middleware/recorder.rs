use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::store::{LogInfo, Middleware, Store};

/// An in-memory log of store events.
///
/// Clones share the same log, so a recorder can be kept by the caller while
/// its middleware is owned by the store.
///
/// # Examples
///
/// ```
/// use fieldcan::middleware::Recorder;
/// use fieldcan::Store;
///
/// let recorder = Recorder::new();
/// let store = Store::default();
/// store.use_middlewares([recorder.middleware()]).unwrap();
/// store.field("a").set(1).unwrap();
///
/// let copy = Store::default();
/// recorder.replay(&copy).unwrap();
/// assert_eq!(copy.get_state().unwrap(), store.get_state().unwrap());
/// ```
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<LogInfo>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A middleware appending every event to this recorder.
    pub fn middleware(&self) -> Middleware {
        let events = Arc::clone(&self.events);
        Arc::new(move |info: &LogInfo| events.lock().push(info.clone()))
    }

    /// A copy of the events recorded so far.
    pub fn events(&self) -> Vec<LogInfo> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Rebuild the recorded state evolution on `store`.
    ///
    /// The first `CURRENT_STATE` baseline is applied as a patch (skipped when
    /// empty), followed by every recorded `SET_STATE` patch in order. Returns
    /// the number of patches applied.
    pub fn replay(&self, store: &Store) -> Result<usize> {
        let events = self.events();
        let mut applied = 0;
        let mut baseline_seen = false;
        for event in events {
            match event {
                LogInfo::CurrentState { state } if !baseline_seen => {
                    baseline_seen = true;
                    if !state.is_empty() {
                        store.set_state(state)?;
                        applied += 1;
                    }
                }
                LogInfo::SetState { state } => {
                    store.set_state(state)?;
                    applied += 1;
                }
                _ => {}
            }
        }
        debug!(applied, "replayed recorded patches");
        Ok(applied)
    }
}
