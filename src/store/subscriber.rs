use tracing::debug;

use super::store::{Listener, Store, ALL_FIELDS};
use crate::error::{Result, StoreError};

/// A revocable registration of one listener for a fixed set of fields.
///
/// Dropping a subscriber does not unregister it; call
/// [`Subscriber::unsubscribe`] when the observer goes away.
#[derive(Debug)]
pub struct Subscriber {
    store: Option<Store>,
    fields: Vec<String>,
    listener: Option<Listener>,
    listening: bool,
}

impl Subscriber {
    /// An empty field list means every field.
    pub(crate) fn new(store: Store, fields: Vec<String>) -> Self {
        let fields = if fields.is_empty() {
            vec![ALL_FIELDS.to_string()]
        } else {
            fields
        };
        Self {
            store: Some(store),
            fields,
            listener: None,
            listening: false,
        }
    }

    pub fn listening(&self) -> bool {
        self.listening
    }

    /// The registry keys this subscriber listens under.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Start listening with `callback`, replacing any previous callback.
    pub fn subscribe<F>(&mut self, callback: F) -> Result<&mut Self>
    where
        F: Fn(&Store, &[String]) + Send + Sync + 'static,
    {
        self.subscribe_listener(Listener::new(callback))
    }

    /// Start listening with an existing listener.
    pub fn subscribe_listener(&mut self, listener: Listener) -> Result<&mut Self> {
        let store = self.store.as_ref().ok_or(StoreError::NotListening)?;
        store.add_listener(&self.fields, &listener)?;
        if let Some(previous) = self.listener.replace(listener.clone()) {
            if previous != listener {
                store.remove_listener(&self.fields, &previous)?;
            }
        }
        self.listening = true;
        Ok(self)
    }

    /// Stop listening and release the store. Calling it again does nothing.
    pub fn unsubscribe(&mut self) {
        let store = self.store.take();
        let listener = self.listener.take();
        if let (Some(store), Some(listener)) = (store, listener) {
            if let Err(err) = store.remove_listener(&self.fields, &listener) {
                debug!(%err, "unsubscribe skipped");
            }
        }
        self.fields.clear();
        self.listening = false;
    }

    /// Invoke the callback once with `fields`, outside of any state change.
    ///
    /// Handy right after subscribing, to sync an observer with the current state.
    pub fn emit(&self, fields: &[String]) -> Result<&Self> {
        match (&self.store, &self.listener) {
            (Some(store), Some(listener)) if self.listening => {
                listener.call(store, fields);
                Ok(self)
            }
            _ => Err(StoreError::NotListening),
        }
    }
}
