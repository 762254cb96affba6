//! Todo list driven by actions and reducers
//!
//! Run with `RUST_LOG=fieldcan=debug` to see every store event.

use fieldcan::middleware::{logger, Recorder};
use fieldcan::{create_store, Action, State, Store};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn initial_state() -> State {
    let mut state = State::new();
    state.insert("list".to_string(), json!([]));
    state.insert("filter".to_string(), json!("all"));
    state
}

fn register_reducers(store: &Store) -> fieldcan::Result<()> {
    store
        .register("ADD_ITEM", |store, action| {
            let text = action.get("text").cloned().unwrap_or(Value::Null);
            store.field("list").unshift(text)?;
            Ok(())
        })?
        .register("REMOVE_ITEM", |store, action| {
            let index = action.get("index").and_then(Value::as_u64).unwrap_or(0) as usize;
            store.field("list").splice(index, Some(1))?;
            Ok(())
        })?
        .register("SET_FILTER", |store, action| {
            let filter = action.get("filter").cloned().unwrap_or(json!("all"));
            store.field("filter").set(filter)?;
            Ok(())
        })?;
    Ok(())
}

fn main() -> fieldcan::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Fieldcan Example: Todo App ===\n");

    let store = create_store(initial_state());
    let recorder = Recorder::new();
    store.use_middlewares([logger(), recorder.middleware()])?;
    register_reducers(&store)?;

    // Only re-render the list view when the list changes
    println!("1. Setting up subscribers");
    let mut list_view = store.subscribe(["list"], |store, fields| {
        let list = store.field("list").get().unwrap_or(Value::Null);
        println!("   [List view] {:?} changed: {}", fields, list);
    })?;
    let mut filter_view = store.field("filter").subscribe(|filter| {
        println!("   [Filter view] now showing {}", filter);
    })?;

    println!("\n2. Adding todos");
    for text in ["Learn Rust", "Build reactive library", "Write documentation"] {
        store.dispatch(Action::new("ADD_ITEM").with("text", text))?;
    }

    println!("\n3. Removing the second todo");
    store.dispatch(Action::new("REMOVE_ITEM").with("index", 1))?;

    println!("\n4. Changing filter");
    store.dispatch(Action::new("SET_FILTER").with("filter", "active"))?;

    println!("\n5. Unknown actions are rejected");
    if let Err(err) = store.dispatch(Action::new("ARCHIVE")) {
        println!("   {}", err);
    }

    list_view.unsubscribe();
    filter_view.unsubscribe();

    println!("\n6. Replaying {} recorded events into a fresh store", recorder.len());
    let replica = Store::default();
    let applied = recorder.replay(&replica)?;
    println!("   applied {} patches", applied);
    println!("   replica state: {}", Value::Object(replica.get_state()?));

    println!("\n✓ Example complete!");
    Ok(())
}
