use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message describing an intended state transition.
///
/// Anything that converts into an `Action` can be dispatched: a bare type
/// string, a `(type, payload)` pair, or a fully built action.
///
/// ```
/// use serde_json::json;
/// use strata::Action;
///
/// let explicit = Action::with_payload("APPEND", json!({ "x": 1 }));
/// let shorthand: Action = ("APPEND", json!({ "x": 1 })).into();
/// assert_eq!(explicit, shorthand);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    /// The action type identifier.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl From<&str> for Action {
    fn from(kind: &str) -> Self {
        Action::new(kind)
    }
}

impl From<String> for Action {
    fn from(kind: String) -> Self {
        Action::new(kind)
    }
}

impl<K: Into<String>> From<(K, Value)> for Action {
    fn from((kind, payload): (K, Value)) -> Self {
        Action::with_payload(kind, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_shapes_normalize_to_one_action() {
        let bare: Action = "ADD_TOAST".into();
        assert_eq!(bare, Action::new("ADD_TOAST"));
        assert_eq!(bare.payload(), None);

        let pair: Action = ("APPEND".to_string(), json!({ "x": 1 })).into();
        assert_eq!(pair.kind(), "APPEND");
        assert_eq!(pair.payload(), Some(&json!({ "x": 1 })));
    }

    #[test]
    fn serializes_with_type_field() {
        let action: Action = serde_json::from_value(json!({ "type": "ADD_TOAST" })).unwrap();
        assert!(action.is("ADD_TOAST"));
        assert_eq!(action.payload, None);

        let encoded = serde_json::to_value(Action::with_payload("SET", json!(1))).unwrap();
        assert_eq!(encoded, json!({ "type": "SET", "payload": 1 }));
    }
}
