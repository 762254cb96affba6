//! Saving the whole state on every change, with one all-fields subscription

use fieldcan::binding::{ConnectOptions, Connection};
use fieldcan::{State, Store};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn state_file() -> PathBuf {
    std::env::temp_dir().join("fieldcan-persistence-demo.json")
}

fn load_state() -> State {
    fs::read_to_string(state_file())
        .ok()
        .and_then(|text| serde_json::from_str::<State>(&text).ok())
        .unwrap_or_else(|| {
            let mut state = State::new();
            state.insert("list".to_string(), json!([]));
            state
        })
}

fn main() -> fieldcan::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Fieldcan Example: Persistence ===\n");

    let store = Store::new(load_state());
    println!("Loaded: {}", Value::Object(store.get_state()?));

    // An empty field list means every field
    let mut saver = store.subscribe(Vec::<String>::new(), |store, _fields| {
        let Ok(state) = store.get_state() else { return };
        match serde_json::to_string_pretty(&state) {
            Ok(text) => {
                if let Err(err) = fs::write(state_file(), text) {
                    eprintln!("   cannot save state: {}", err);
                }
            }
            Err(err) => eprintln!("   cannot encode state: {}", err),
        }
    })?;

    let runs = store.field("runs");
    if runs.get()?.is_null() {
        runs.set(0)?;
    }
    runs.add(1)?;

    // A view that only cares about the list, tied to its own lifetime
    {
        let _view = Connection::enter(
            &store,
            ConnectOptions::new().subscribe(["list"]),
            |state| println!("   [View] list = {}", state.get("list").unwrap_or(&Value::Null)),
        )?;

        store.field("list").push(format!("run #{}", runs.get()?))?;
    }

    // The view has exited; only the saver still listens
    store.field("last_run").set(runs.get()?)?;
    saver.unsubscribe();

    println!("\nSaved to {}", state_file().display());
    Ok(())
}
