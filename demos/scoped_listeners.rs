//! Listeners that only care about part of the state tree

use serde_json::{json, Value};
use std::rc::Rc;
use strata::{merge, Action, Listener, StateView, Store};

fn profile(action: Option<&Action>, state: Option<&Value>) -> Value {
    let state = state
        .cloned()
        .unwrap_or_else(|| json!({ "name": "guest", "address": { "city": "nowhere" } }));
    match action {
        Some(action) if action.is("UPDATE_PROFILE") => merge(&state, action.payload()),
        _ => state,
    }
}

fn session(action: Option<&Action>, state: Option<&Value>) -> Value {
    match action.map(Action::kind) {
        Some("LOGIN") => json!({ "logged_in": true }),
        Some("LOGOUT") => json!({ "logged_in": false }),
        _ => state.cloned().unwrap_or_else(|| json!({ "logged_in": false })),
    }
}

struct ProfileBadge;

impl Listener for ProfileBadge {
    fn state_changed(&self, state: &StateView, _action: Option<&str>) {
        let name = state.path("name").and_then(|n| n.as_str()).unwrap_or("?");
        let city = state.path("address.city").and_then(|n| n.as_str()).unwrap_or("?");
        println!("   [badge] {} from {}", name, city);
    }
}

fn main() {
    env_logger::init();

    println!("=== Scoped Listeners ===\n");

    let store = Store::builder()
        .reducer("profile", profile)
        .reducer("session", session)
        .build()
        .expect("valid reducer bindings");

    let badge = Rc::new(ProfileBadge);
    store.subscribe_with(badge.clone(), |_| ["profile"]);
    store.subscribe(Rc::new(|state: &StateView, action: Option<&str>| {
        println!("   [audit] {:?} -> {}", action, state);
    }));

    println!("Logging in (badge stays quiet)");
    store.dispatch("LOGIN");

    println!("\nUpdating profile");
    store.dispatch((
        "UPDATE_PROFILE",
        json!({ "name": "Alex", "address": { "city": "Lisbon" } }),
    ));

    println!("\nAbandoning the badge");
    store.abandon(&badge);
    store.dispatch(("UPDATE_PROFILE", json!({ "name": "Mike" })));

    println!("\nListeners left: {}", store.listener_count());
}
