//! Demonstration of a store managing a todo list

use serde_json::{json, Value};
use std::rc::Rc;
use strata::{Action, StateView, Store};

fn todos(action: Option<&Action>, state: Option<&Value>) -> Value {
    let mut items = state.and_then(Value::as_array).cloned().unwrap_or_default();
    let Some(action) = action else {
        return Value::Array(items);
    };

    match action.kind() {
        "ADD_TODO" => {
            let title = action.payload().cloned().unwrap_or(Value::Null);
            items.push(json!({ "id": items.len(), "title": title, "completed": false }));
        }
        "TOGGLE_TODO" => {
            let id = action.payload().and_then(Value::as_u64);
            for item in items.iter_mut() {
                if item["id"].as_u64() == id {
                    let done = item["completed"].as_bool().unwrap_or(false);
                    item["completed"] = json!(!done);
                }
            }
        }
        _ => {}
    }
    Value::Array(items)
}

fn filter(action: Option<&Action>, state: Option<&Value>) -> Value {
    match action {
        Some(action) if action.is("SET_FILTER") => {
            action.payload().cloned().unwrap_or_else(|| json!("all"))
        }
        _ => state.cloned().unwrap_or_else(|| json!("all")),
    }
}

fn stats(state: &StateView) -> (usize, usize) {
    let items = state.get("todos").and_then(Value::as_array);
    let total = items.map_or(0, Vec::len);
    let completed = items.map_or(0, |items| {
        items.iter().filter(|item| item["completed"] == json!(true)).count()
    });
    (total, completed)
}

fn main() {
    env_logger::init();

    println!("=== Store Example: Todo App ===\n");

    let store = Store::builder()
        .reducer("todos", todos)
        .reducer("filter", filter)
        .build()
        .expect("valid reducer bindings");

    println!("1. Setting up subscriber");
    store.subscribe(Rc::new(|state: &StateView, action: Option<&str>| {
        let (total, completed) = stats(state);
        println!(
            "   [{}] Total: {}, Completed: {}",
            action.unwrap_or("?"),
            total,
            completed
        );
    }));

    // Switch back to showing everything once the list is done.
    let handle = store.downgrade();
    store.subscribe(Rc::new(move |state: &StateView, _: Option<&str>| {
        let (total, completed) = stats(state);
        let Some(store) = handle.upgrade() else {
            return;
        };
        if total > 0 && total == completed && state["filter"] != json!("all") {
            store.dispatch(("SET_FILTER", json!("all")));
        }
    }));

    println!("\n2. Adding todos");
    store.dispatch(("ADD_TODO", json!("Learn Rust")));
    store.dispatch(("ADD_TODO", json!("Build a state container")));

    println!("\n3. Completing the first todo, then filtering");
    store.dispatch_then(("TOGGLE_TODO", json!(0)), |store| {
        store.dispatch(("SET_FILTER", json!("completed")));
    });

    println!("\n4. Completing the second todo (filter resets to all)");
    store.dispatch(("TOGGLE_TODO", json!(1)));

    println!("\n5. Dispatching an unknown action (no notification)");
    store.dispatch("NOTHING_TO_SEE");

    println!("\nFinal state: {:#}", store.state());
}
