use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

static NULL: Value = Value::Null;

/// A read-only snapshot of a mapping in the state tree.
///
/// The mapping is captured by value when the view is built, so later changes
/// to the store never show through. Nested mappings are wrapped in further
/// views on first access and the wrapper is cached for subsequent lookups.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata::StateView;
///
/// let view = StateView::from_value(json!({ "a": { "b": { "c": 5 } } })).unwrap();
/// assert_eq!(view.path("a.b.c").unwrap(), json!(5));
/// assert!(view.navigate("missing").is_none());
/// ```
#[derive(Clone, Default)]
pub struct StateView {
    entries: Map<String, Value>,
    nested: BTreeMap<String, OnceCell<StateView>>,
}

/// The result of navigating one key of a [`StateView`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node<'a> {
    /// The key held a mapping.
    View(&'a StateView),
    /// The key held any other value.
    Value(&'a Value),
}

impl StateView {
    /// Capture a view over `entries`.
    pub fn new(entries: Map<String, Value>) -> Self {
        let nested = entries
            .iter()
            .filter(|(_, value)| value.is_object())
            .map(|(key, _)| (key.clone(), OnceCell::new()))
            .collect();
        Self { entries, nested }
    }

    /// Capture a view over a JSON value. Only objects can be viewed.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(entries) => Some(Self::new(entries)),
            _ => None,
        }
    }

    /// Look up a single key.
    ///
    /// Mappings come back as a [`Node::View`], everything else as the stored
    /// value. Absent keys yield `None`.
    pub fn navigate(&self, key: &str) -> Option<Node<'_>> {
        let value = self.entries.get(key)?;
        match (value, self.nested.get(key)) {
            (Value::Object(map), Some(cell)) => {
                Some(Node::View(cell.get_or_init(|| StateView::new(map.clone()))))
            }
            _ => Some(Node::Value(value)),
        }
    }

    /// Follow a dotted path such as `"a.b.c"`.
    pub fn path(&self, dotted: &str) -> Option<Node<'_>> {
        self.path_segments(dotted.split('.'))
    }

    /// Follow a path given as separate segments.
    ///
    /// Stops with `None` at the first absent key, or when a leaf value is
    /// reached before the last segment.
    pub fn path_segments<I, S>(&self, segments: I) -> Option<Node<'_>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = segments.into_iter();
        let mut node = self.navigate(segments.next()?.as_ref())?;
        for segment in segments {
            node = node.as_view()?.navigate(segment.as_ref())?;
        }
        Some(node)
    }

    /// Raw value stored under `key`, without wrapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Top-level keys in map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy of the captured mapping.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }
}

impl<'a> Node<'a> {
    pub fn as_view(&self) -> Option<&'a StateView> {
        match self {
            Node::View(view) => Some(view),
            Node::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Node::View(_) => None,
            Node::Value(value) => Some(value),
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// Owned copy of whatever the node holds.
    pub fn to_value(&self) -> Value {
        match self {
            Node::View(view) => view.to_value(),
            Node::Value(value) => (*value).clone(),
        }
    }
}

impl PartialEq<Value> for Node<'_> {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Node::View(view), Value::Object(map)) => view.entries == *map,
            (Node::View(_), _) => false,
            (Node::Value(value), other) => *value == other,
        }
    }
}

// The lazily filled cache is derived from `entries`, so it never takes part
// in equality.
impl PartialEq for StateView {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl PartialEq<Value> for StateView {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::Object(map) if self.entries == *map)
    }
}

impl From<Map<String, Value>> for StateView {
    fn from(entries: Map<String, Value>) -> Self {
        Self::new(entries)
    }
}

impl Index<&str> for StateView {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.entries.get(key).unwrap_or(&NULL)
    }
}

impl fmt::Display for StateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = if f.alternate() {
            serde_json::to_string_pretty(&self.entries)
        } else {
            serde_json::to_string(&self.entries)
        };
        f.write_str(&rendered.map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for StateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateView({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(value: Value) -> StateView {
        StateView::from_value(value).unwrap()
    }

    #[test]
    fn navigate_wraps_nested_mappings() {
        let state = view(json!({ "a": { "b": { "c": 5 } }, "name": "Alex" }));

        let a = state.navigate("a").and_then(|n| n.as_view()).unwrap();
        let b = a.navigate("b").and_then(|n| n.as_view()).unwrap();
        assert_eq!(b.navigate("c").and_then(|n| n.as_i64()), Some(5));
        assert_eq!(state.navigate("name").and_then(|n| n.as_str()), Some("Alex"));
    }

    #[test]
    fn navigate_absent_key_is_none() {
        let state = view(json!({ "a": 1 }));
        assert!(state.navigate("b").is_none());
        assert!(state.path("a.b").is_none());
        assert_eq!(state["b"], Value::Null);
    }

    #[test]
    fn repeated_navigation_returns_cached_view() {
        let state = view(json!({ "a": { "b": 1 } }));

        let first = state.navigate("a").and_then(|n| n.as_view()).unwrap();
        let second = state.navigate("a").and_then(|n| n.as_view()).unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
    }

    #[test]
    fn path_walks_dotted_and_segmented_paths() {
        let state = view(json!({ "a": { "b": { "c": 5 } } }));

        assert_eq!(state.path("a.b.c").unwrap(), json!(5));
        assert_eq!(state.path_segments(["a", "b"]).unwrap(), json!({ "c": 5 }));
        assert!(state.path("a.b.c.d").is_none());
        assert!(state.path_segments(Vec::<&str>::new()).is_none());
    }

    #[test]
    fn view_is_a_copy_of_its_source() {
        let mut source = Map::new();
        source.insert("wow".to_string(), json!("now"));
        let state = StateView::new(source.clone());

        source.insert("wow".to_string(), json!("later"));
        assert_eq!(state["wow"], json!("now"));
    }

    #[test]
    fn display_renders_captured_mapping() {
        let state = view(json!({ "a": { "b": 1 } }));
        let _ = state.navigate("a");
        assert_eq!(state.to_string(), r#"{"a":{"b":1}}"#);
        assert_eq!(format!("{:?}", state), r#"StateView({"a":{"b":1}})"#);
    }

    #[test]
    fn from_value_rejects_leaves() {
        assert!(StateView::from_value(json!(3)).is_none());
        assert!(StateView::from_value(json!({})).unwrap().is_empty());
    }
}
