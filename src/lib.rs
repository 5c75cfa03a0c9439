//! # Strata
//!
//! A small unidirectional state container for Rust.
//!
//! State lives in a single [`Store`] as a tree of named sub-states. Each
//! top-level key is owned by one [`Reducer`], a pure function that computes the
//! next sub-state from the current one and a dispatched [`Action`].
//!
//! - `Store` - owns the state, runs reducers on dispatch, notifies listeners
//! - `StateView` - read-only snapshot with nested, dot-path navigation
//! - `Listener` - receives a fresh view after every change it cares about
//!
//! Dispatch is synchronous and bound to one thread. Only keys whose value
//! actually changed are announced, so no-op actions cost listeners nothing.

pub mod error;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use error::{ConfigurationError, StoreError};
pub use store::{
    merge, Action, Listener, Reducer, Store, StoreBuilder, SubscriptionId, WeakStore,
};
pub use view::{Node, StateView};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn it_works() {
        // Basic smoke test
        fn toggle(action: Option<&Action>, state: Option<&Value>) -> Value {
            let on = state.and_then(Value::as_bool).unwrap_or(false);
            match action {
                Some(action) if action.is("TOGGLE") => json!(!on),
                _ => json!(on),
            }
        }

        let store = Store::builder().reducer("light", toggle).build().unwrap();
        assert_eq!(store.get("light"), Some(json!(false)));
        store.dispatch("TOGGLE");
        assert_eq!(store.get("light"), Some(json!(true)));
    }
}
