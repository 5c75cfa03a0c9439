use super::Action;
use serde_json::Value;

/// A pure transformation bound to one top-level state key.
///
/// `reduce` is first called with no action and no state and must return the
/// initial sub-state. Afterwards it receives every dispatched action together
/// with its current sub-state, and returns the next sub-state (the same value
/// when the action does not apply).
///
/// Closures of the matching shape are reducers:
///
/// ```
/// use serde_json::{json, Value};
/// use strata::{Action, Reducer};
///
/// let counter = |action: Option<&Action>, state: Option<&Value>| {
///     let current = state.and_then(Value::as_i64).unwrap_or(0);
///     match action {
///         Some(action) if action.is("INCREMENT") => json!(current + 1),
///         _ => json!(current),
///     }
/// };
/// assert_eq!(counter.reduce(None, None), json!(0));
/// ```
pub trait Reducer {
    fn reduce(&self, action: Option<&Action>, state: Option<&Value>) -> Value;
}

impl<F> Reducer for F
where
    F: Fn(Option<&Action>, Option<&Value>) -> Value,
{
    fn reduce(&self, action: Option<&Action>, state: Option<&Value>) -> Value {
        self(action, state)
    }
}

/// Shallow-merge `patch` into `state` when both are objects.
///
/// Any other combination yields `patch` itself, or `state` when there is no
/// patch. Handy for reducers that append payloads.
pub fn merge(state: &Value, patch: Option<&Value>) -> Value {
    match (state, patch) {
        (Value::Object(current), Some(Value::Object(extra))) => {
            let mut next = current.clone();
            next.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(next)
        }
        (_, Some(patch)) => patch.clone(),
        (state, None) => state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overlays_payload() {
        let merged = merge(&json!({ "wow": "now", "x": 0 }), Some(&json!({ "x": 1 })));
        assert_eq!(merged, json!({ "wow": "now", "x": 1 }));
    }

    #[test]
    fn merge_without_patch_keeps_state() {
        assert_eq!(merge(&json!({ "a": 1 }), None), json!({ "a": 1 }));
        assert_eq!(merge(&json!(1), Some(&json!(2))), json!(2));
    }
}
