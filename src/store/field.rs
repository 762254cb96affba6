use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use tracing::warn;

use super::event::State;
use super::store::Store;
use super::subscriber::Subscriber;
use crate::error::{Result, StoreError};

/// Accessor for a single field of a [`Store`].
///
/// Every operation reads from and writes through the store, so field handles
/// are cheap to create on demand and never hold state of their own.
#[derive(Clone, Debug)]
pub struct StateField {
    store: Store,
    name: String,
}

#[derive(Clone, Copy)]
enum Arith {
    Add,
    Sub,
}

impl StateField {
    pub(crate) fn new(store: Store, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The field's current value, or `Value::Null` if it was never set.
    pub fn get(&self) -> Result<Value> {
        self.store.read_field(&self.name)
    }

    /// Decode the field's current value into `T`.
    pub fn get_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.get()?).map_err(|err| StoreError::Decode {
            field: self.name.clone(),
            message: err.to_string(),
        })
    }

    /// Equivalent to `set_state({ name: value })`.
    pub fn set(&self, value: impl Into<Value>) -> Result<&Self> {
        let mut patch = State::new();
        patch.insert(self.name.clone(), value.into());
        self.store.set_state(patch)?;
        Ok(self)
    }

    /// Set the field to `Value::Null`. The key stays in the state.
    pub fn remove(&self) -> Result<&Self> {
        self.set(Value::Null)
    }

    /// Call `callback` with the field's new value whenever it is set.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscriber>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let name = self.name.clone();
        self.store
            .subscribe([self.name.clone()], move |store, _fields| {
                match store.read_field(&name) {
                    Ok(value) => callback(value),
                    Err(err) => warn!(field = %name, %err, "cannot read subscribed field"),
                }
            })
    }

    fn array(&self) -> Result<Vec<Value>> {
        match self.get()? {
            Value::Array(items) => Ok(items),
            _ => Err(StoreError::NotAnArray {
                field: self.name.clone(),
            }),
        }
    }

    /// Append one item.
    pub fn push(&self, item: impl Into<Value>) -> Result<&Self> {
        self.push_all([item])
    }

    /// Append items in order.
    pub fn push_all<I, V>(&self, items: I) -> Result<&Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut list = self.array()?;
        list.extend(items.into_iter().map(Into::into));
        self.set(list)
    }

    /// Remove and return the last item; `None` when the array is empty.
    pub fn pop(&self) -> Result<Option<Value>> {
        let mut list = self.array()?;
        let item = list.pop();
        self.set(list)?;
        Ok(item)
    }

    /// Remove and return the first item; `None` when the array is empty.
    pub fn shift(&self) -> Result<Option<Value>> {
        let mut list = self.array()?;
        let item = if list.is_empty() {
            None
        } else {
            Some(list.remove(0))
        };
        self.set(list)?;
        Ok(item)
    }

    /// Insert one item at the front.
    pub fn unshift(&self, item: impl Into<Value>) -> Result<&Self> {
        self.unshift_all([item])
    }

    /// Insert items at the front, keeping their order.
    pub fn unshift_all<I, V>(&self, items: I) -> Result<&Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = self.array()?;
        let mut front: Vec<Value> = items.into_iter().map(Into::into).collect();
        front.extend(list);
        self.set(front)
    }

    /// Remove `delete_count` items starting at `start`, or everything from
    /// `start` on when `delete_count` is `None`. Out-of-range bounds clamp.
    pub fn splice(&self, start: usize, delete_count: Option<usize>) -> Result<&Self> {
        let mut list = self.array()?;
        let start = start.min(list.len());
        let end = match delete_count {
            Some(count) => start.saturating_add(count).min(list.len()),
            None => list.len(),
        };
        list.drain(start..end);
        self.set(list)
    }

    /// Add `n` to a numeric field.
    pub fn add(&self, n: impl Into<Value>) -> Result<&Self> {
        self.arith(n.into(), Arith::Add)
    }

    /// Subtract `n` from a numeric field.
    pub fn sub(&self, n: impl Into<Value>) -> Result<&Self> {
        self.arith(n.into(), Arith::Sub)
    }

    fn arith(&self, operand: Value, op: Arith) -> Result<&Self> {
        let current = self.get()?;
        if !current.is_number() || !operand.is_number() {
            return Err(StoreError::NotANumber {
                field: self.name.clone(),
            });
        }
        let value = combine(&current, &operand, op).ok_or_else(|| StoreError::NumericOverflow {
            field: self.name.clone(),
        })?;
        self.set(value)
    }
}

// Integer arithmetic when both sides are integers and it fits, float otherwise.
// `None` when the float result is not finite.
fn combine(current: &Value, operand: &Value, op: Arith) -> Option<Value> {
    if let (Some(a), Some(b)) = (current.as_i64(), operand.as_i64()) {
        let exact = match op {
            Arith::Add => a.checked_add(b),
            Arith::Sub => a.checked_sub(b),
        };
        if let Some(n) = exact {
            return Some(Value::from(n));
        }
    }
    let (a, b) = (current.as_f64()?, operand.as_f64()?);
    let n = match op {
        Arith::Add => a + b,
        Arith::Sub => a - b,
    };
    Number::from_f64(n).map(Value::Number)
}
