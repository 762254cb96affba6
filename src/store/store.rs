use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use super::event::{Action, LogInfo, State};
use super::field::StateField;
use super::subscriber::Subscriber;
use crate::error::{Result, StoreError};

/// Reserved listener key meaning "notify on any field".
pub const ALL_FIELDS: &str = "@@fieldcan/ALL_FIELDS";

/// Observer of every logged store event.
pub type Middleware = Arc<dyn Fn(&LogInfo) + Send + Sync>;

/// Handler for one action type. Applies its effect through `set_state`.
pub type Reducer = Arc<dyn Fn(&Store, &Action) -> Result<()> + Send + Sync>;

/// A change callback, invoked with the store and the names of the changed fields.
///
/// Clones share identity: registering two clones of one listener is the same
/// as registering it once, and either clone removes it.
#[derive(Clone)]
pub struct Listener(Arc<dyn Fn(&Store, &[String]) + Send + Sync>);

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Store, &[String]) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Invoke the callback directly.
    pub fn call(&self, store: &Store, fields: &[String]) {
        (self.0)(store, fields)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:#x})", self.addr())
    }
}

/// A key-value state container with field-level change notification.
///
/// The store is a cheap handle: clones share the same state, listeners,
/// middlewares and reducers. Every mutation goes through [`Store::set_state`],
/// which logs to the middleware pipeline and then synchronously notifies the
/// listeners registered for the changed fields.
///
/// # Examples
///
/// ```
/// use fieldcan::{create_store, State};
/// use serde_json::json;
///
/// let mut initial = State::new();
/// initial.insert("count".to_string(), json!(1));
/// let store = create_store(initial);
///
/// store.field("count").add(2).unwrap();
/// assert_eq!(store.field("count").get().unwrap(), json!(3));
/// ```
pub struct Store {
    alive: Arc<AtomicBool>,
    state: Arc<RwLock<State>>,
    listeners: Arc<RwLock<FxHashMap<String, Vec<Listener>>>>,
    middlewares: Arc<RwLock<Vec<Middleware>>>,
    reducers: Arc<RwLock<FxHashMap<String, Reducer>>>,
}

impl Store {
    /// Create a new store that takes `initial` as its first snapshot.
    pub fn new(initial: State) -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            state: Arc::new(RwLock::new(initial)),
            listeners: Arc::new(RwLock::new(FxHashMap::default())),
            middlewares: Arc::new(RwLock::new(Vec::new())),
            reducers: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// Whether [`Store::destroy`] has been called.
    pub fn is_destroyed(&self) -> bool {
        !self.alive.load(Ordering::SeqCst)
    }

    /// Whether two handles point at the same store.
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(StoreError::Destroyed);
        }
        Ok(())
    }

    /// Get a copy of the current state.
    pub fn get_state(&self) -> Result<State> {
        self.ensure_alive()?;
        Ok(self.state.read().clone())
    }

    /// Read a single field without copying the whole snapshot.
    pub(crate) fn read_field(&self, name: &str) -> Result<Value> {
        self.ensure_alive()?;
        Ok(self.state.read().get(name).cloned().unwrap_or(Value::Null))
    }

    /// Merge `patch` into the state and notify interested listeners.
    ///
    /// Keys in the patch overwrite or add fields; fields missing from the
    /// patch are left alone. Middlewares see `SET_STATE` before the merge and
    /// `STATE_CHANGE` after it; listeners run last, once each, even when
    /// registered under several of the changed fields.
    ///
    /// A middleware that destroys the store while the patch is being logged
    /// aborts the merge with [`StoreError::Destroyed`].
    pub fn set_state(&self, patch: State) -> Result<&Self> {
        self.ensure_alive()?;
        self.log(&LogInfo::SetState {
            state: patch.clone(),
        });
        self.ensure_alive()?;

        let mut fields = Vec::with_capacity(patch.len());
        let mut new_state = self.state.read().clone();
        let callbacks = {
            let listeners = self.listeners.read();
            let mut seen = FxHashSet::default();
            let mut callbacks = Vec::new();
            collect_listeners(listeners.get(ALL_FIELDS), &mut seen, &mut callbacks);
            for (name, value) in &patch {
                fields.push(name.clone());
                new_state.insert(name.clone(), value.clone());
                collect_listeners(listeners.get(name), &mut seen, &mut callbacks);
            }
            callbacks
        };

        self.log(&LogInfo::StateChange {
            state: patch,
            new_state: new_state.clone(),
        });
        self.ensure_alive()?;
        *self.state.write() = new_state;

        trace!(?fields, listeners = callbacks.len(), "state changed");
        for listener in &callbacks {
            listener.call(self, &fields);
        }
        Ok(self)
    }

    fn log(&self, info: &LogInfo) {
        let middlewares = self.middlewares.read().clone();
        for middleware in &middlewares {
            middleware(info);
        }
    }

    /// Get an accessor for one field.
    pub fn field(&self, name: impl Into<String>) -> StateField {
        StateField::new(self.clone(), name)
    }

    /// Subscribe `callback` to changes of `fields`.
    ///
    /// An empty field list subscribes to every field, including ones that
    /// appear later.
    pub fn subscribe<I, S, F>(&self, fields: I, callback: F) -> Result<Subscriber>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Store, &[String]) + Send + Sync + 'static,
    {
        self.subscribe_listener(fields, Listener::new(callback))
    }

    /// Like [`Store::subscribe`], reusing an existing listener.
    pub fn subscribe_listener<I, S>(&self, fields: I, listener: Listener) -> Result<Subscriber>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut subscriber = self.for_fields(fields);
        subscriber.subscribe_listener(listener)?;
        Ok(subscriber)
    }

    /// A not-yet-listening subscriber for `fields`.
    pub fn for_fields<I, S>(&self, fields: I) -> Subscriber
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Subscriber::new(self.clone(), fields.into_iter().map(Into::into).collect())
    }

    /// A not-yet-listening subscriber for every field.
    pub fn all_fields(&self) -> Subscriber {
        Subscriber::new(self.clone(), Vec::new())
    }

    /// Register `listener` under each of `fields`. Registering twice is a no-op.
    pub fn add_listener<S: AsRef<str>>(&self, fields: &[S], listener: &Listener) -> Result<&Self> {
        self.ensure_alive()?;
        let mut listeners = self.listeners.write();
        for name in fields {
            let list = listeners.entry(name.as_ref().to_string()).or_default();
            if !list.contains(listener) {
                list.push(listener.clone());
            }
        }
        Ok(self)
    }

    /// Remove `listener` from each of `fields`. Unknown pairs are ignored.
    pub fn remove_listener<S: AsRef<str>>(
        &self,
        fields: &[S],
        listener: &Listener,
    ) -> Result<&Self> {
        self.ensure_alive()?;
        let mut listeners = self.listeners.write();
        for name in fields {
            if let Some(list) = listeners.get_mut(name.as_ref()) {
                if let Some(i) = list.iter().position(|l| l == listener) {
                    list.remove(i);
                }
            }
        }
        Ok(self)
    }

    /// Append one middleware. See [`Store::use_middlewares`].
    pub fn use_middleware<F>(&self, middleware: F) -> Result<&Self>
    where
        F: Fn(&LogInfo) + Send + Sync + 'static,
    {
        self.use_middlewares([Arc::new(middleware) as Middleware])
    }

    /// Append middlewares in order, then hand each new one a `CURRENT_STATE`
    /// event so it starts from a known baseline.
    pub fn use_middlewares<I>(&self, middlewares: I) -> Result<&Self>
    where
        I: IntoIterator<Item = Middleware>,
    {
        self.ensure_alive()?;
        let added: Vec<Middleware> = middlewares.into_iter().collect();
        self.middlewares.write().extend(added.iter().cloned());
        debug!(count = added.len(), "middleware registered");

        for middleware in &added {
            let state = self.get_state()?;
            middleware(&LogInfo::CurrentState { state });
        }
        Ok(self)
    }

    /// Install the reducer for `action_type`, replacing any previous one.
    pub fn register<F>(&self, action_type: impl Into<String>, reducer: F) -> Result<&Self>
    where
        F: Fn(&Store, &Action) -> Result<()> + Send + Sync + 'static,
    {
        self.ensure_alive()?;
        self.reducers
            .write()
            .insert(action_type.into(), Arc::new(reducer));
        Ok(self)
    }

    /// Run the reducer registered for `action.action_type`.
    ///
    /// Fails with [`StoreError::UnknownAction`] before logging anything when no
    /// reducer is registered.
    pub fn dispatch(&self, action: Action) -> Result<&Self> {
        self.ensure_alive()?;
        let reducer = self
            .reducers
            .read()
            .get(&action.action_type)
            .cloned()
            .ok_or_else(|| StoreError::UnknownAction(action.action_type.clone()))?;

        debug!(action = %action.action_type, "dispatch");
        self.log(&LogInfo::Action(action.clone()));
        reducer(self, &action)?;
        Ok(self)
    }

    /// Release state, listeners, middlewares and reducers.
    ///
    /// Every later operation on this store (and on its clones) fails with
    /// [`StoreError::Destroyed`].
    pub fn destroy(&self) {
        if !self.alive.swap(false, Ordering::SeqCst) {
            return;
        }
        self.state.write().clear();
        self.listeners.write().clear();
        self.middlewares.write().clear();
        self.reducers.write().clear();
        debug!("store destroyed");
    }
}

fn collect_listeners(
    list: Option<&Vec<Listener>>,
    seen: &mut FxHashSet<usize>,
    out: &mut Vec<Listener>,
) {
    for listener in list.into_iter().flatten() {
        if seen.insert(listener.addr()) {
            out.push(listener.clone());
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::new())
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            alive: Arc::clone(&self.alive),
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
            middlewares: Arc::clone(&self.middlewares),
            reducers: Arc::clone(&self.reducers),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("destroyed", &self.is_destroyed())
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

/// Create a store from an initial state.
pub fn create_store(initial: State) -> Store {
    Store::new(initial)
}
