use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::error::Result;
use crate::store::{State, Store, Subscriber};

type MapState = Arc<dyn Fn(State) -> State + Send + Sync>;

/// What a [`Connection`] subscribes to and how it shapes the snapshot.
#[derive(Clone, Default)]
pub struct ConnectOptions {
    subscribe: Option<Vec<String>>,
    map_state: Option<MapState>,
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-render when any of `fields` changes. An empty list means any field.
    pub fn subscribe<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subscribe = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Project the snapshot before it reaches the render callback.
    pub fn map_state<F>(mut self, map: F) -> Self
    where
        F: Fn(State) -> State + Send + Sync + 'static,
    {
        self.map_state = Some(Arc::new(map));
        self
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("subscribe", &self.subscribe)
            .field("map_state", &self.map_state.is_some())
            .finish()
    }
}

/// A store handle tied to an observer's lifetime.
///
/// Entering subscribes the render callback (when the options ask for it) and
/// renders once with the current state. Exiting, explicitly or on drop,
/// unsubscribes.
#[derive(Debug)]
pub struct Connection {
    store: Store,
    subscriber: Option<Subscriber>,
}

impl Connection {
    pub fn enter<R>(store: &Store, options: ConnectOptions, render: R) -> Result<Self>
    where
        R: Fn(State) + Send + Sync + 'static,
    {
        let subscriber = match options.subscribe {
            Some(fields) => {
                let map_state = options.map_state;
                let subscriber = store.subscribe(fields, move |store, _fields| {
                    match store.get_state() {
                        Ok(state) => match &map_state {
                            Some(map) => render(map(state)),
                            None => render(state),
                        },
                        Err(err) => warn!(%err, "connection cannot read state"),
                    }
                })?;
                subscriber.emit(&[])?;
                Some(subscriber)
            }
            None => None,
        };

        Ok(Self {
            store: store.clone(),
            subscriber,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscriber.as_ref().is_some_and(Subscriber::listening)
    }

    /// Unsubscribe. Safe to call more than once.
    pub fn exit(&mut self) {
        if let Some(mut subscriber) = self.subscriber.take() {
            subscriber.unsubscribe();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.exit();
    }
}
