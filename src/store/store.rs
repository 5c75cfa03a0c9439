use super::listener::{Listener, Subscription, SubscriptionId};
use super::{Action, Reducer};
use crate::error::{ConfigurationError, StoreError};
use crate::view::StateView;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

type Binding = (String, Box<dyn Reducer>);

/// The single owner of application state.
///
/// Each top-level key is owned by one reducer. Dispatching an action runs
/// every reducer in registration order; keys whose value actually changed
/// are written back and announced to listeners.
///
/// Handles are cheap to clone and share the same state. The store is bound
/// to one thread; listeners and completion callbacks may dispatch again,
/// which runs as a plain nested call. A listener that keeps a handle to its
/// own store should hold a [`WeakStore`], otherwise the store is never freed.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Value};
/// use strata::{merge, Action, Store};
///
/// fn sample(action: Option<&Action>, state: Option<&Value>) -> Value {
///     let state = state.cloned().unwrap_or_else(|| json!({ "wow": "now" }));
///     match action {
///         Some(action) if action.is("APPEND") => merge(&state, action.payload()),
///         _ => state,
///     }
/// }
///
/// let store = Store::builder().reducer("sample", sample).build().unwrap();
/// store.dispatch(("APPEND", json!({ "x": 1 })));
/// assert_eq!(store.state().path("sample.x").unwrap(), json!(1));
/// ```
pub struct Store {
    state: Rc<RefCell<Map<String, Value>>>,
    reducers: Rc<[Binding]>,
    listeners: Rc<RefCell<Vec<Subscription>>>,
    next_id: Rc<Cell<usize>>,
    // Bumped whenever a subscription is removed.
    revision: Rc<Cell<u64>>,
}

/// A non-owning handle to a [`Store`].
///
/// ```
/// use serde_json::{json, Value};
/// use std::rc::Rc;
/// use strata::{Action, StateView, Store};
///
/// fn count(action: Option<&Action>, state: Option<&Value>) -> Value {
///     let n = state.and_then(Value::as_i64).unwrap_or(0);
///     match action {
///         Some(action) if action.is("INCREMENT") && n < 3 => json!(n + 1),
///         _ => json!(n),
///     }
/// }
///
/// let store = Store::builder().reducer("count", count).build().unwrap();
/// let weak = store.downgrade();
/// store.subscribe(Rc::new(move |_: &StateView, _: Option<&str>| {
///     if let Some(store) = weak.upgrade() {
///         store.dispatch("INCREMENT");
///     }
/// }));
///
/// store.dispatch("INCREMENT");
/// assert_eq!(store.get("count"), Some(json!(3)));
/// ```
pub struct WeakStore {
    state: Weak<RefCell<Map<String, Value>>>,
    reducers: Weak<[Binding]>,
    listeners: Weak<RefCell<Vec<Subscription>>>,
    next_id: Weak<Cell<usize>>,
    revision: Weak<Cell<u64>>,
}

impl WeakStore {
    /// A strong handle, or `None` once every `Store` handle is gone.
    pub fn upgrade(&self) -> Option<Store> {
        Some(Store {
            state: self.state.upgrade()?,
            reducers: self.reducers.upgrade()?,
            listeners: self.listeners.upgrade()?,
            next_id: self.next_id.upgrade()?,
            revision: self.revision.upgrade()?,
        })
    }
}

impl Clone for WeakStore {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
            reducers: Weak::clone(&self.reducers),
            listeners: Weak::clone(&self.listeners),
            next_id: Weak::clone(&self.next_id),
            revision: Weak::clone(&self.revision),
        }
    }
}

impl fmt::Debug for WeakStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

/// Collects reducer bindings in registration order.
#[derive(Default)]
pub struct StoreBuilder {
    bindings: Vec<Binding>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `reducer` to the top-level key `key`.
    pub fn reducer<R>(mut self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer + 'static,
    {
        self.bindings.push((key.into(), Box::new(reducer)));
        self
    }

    pub fn build(self) -> Result<Store, StoreError> {
        Store::from_bindings(self.bindings)
    }
}

impl Store {
    /// Create a store from `(key, reducer)` bindings.
    ///
    /// Each reducer is called once with no action and no state to produce
    /// its key's initial value. Construction never notifies listeners.
    pub fn new<I, K>(bindings: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, Box<dyn Reducer>)>,
        K: Into<String>,
    {
        let bindings = bindings
            .into_iter()
            .map(|(key, reducer)| (key.into(), reducer))
            .collect();
        Self::from_bindings(bindings)
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// A handle that does not keep the store alive.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            state: Rc::downgrade(&self.state),
            reducers: Rc::downgrade(&self.reducers),
            listeners: Rc::downgrade(&self.listeners),
            next_id: Rc::downgrade(&self.next_id),
            revision: Rc::downgrade(&self.revision),
        }
    }

    fn from_bindings(bindings: Vec<Binding>) -> Result<Self, StoreError> {
        validate(&bindings)?;

        let mut state = Map::new();
        for (key, reducer) in &bindings {
            state.insert(key.clone(), reducer.reduce(None, None));
        }
        log::debug!("store initialized with keys {:?}", state.keys().collect::<Vec<_>>());

        Ok(Self {
            state: Rc::new(RefCell::new(state)),
            reducers: Rc::from(bindings),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
            revision: Rc::new(Cell::new(0)),
        })
    }

    /// Apply `action` to every reducer.
    pub fn dispatch(&self, action: impl Into<Action>) {
        self.dispatch_then(action, |_| {});
    }

    /// Apply `action`, then run `callback` once every reducer has run and
    /// every resulting notification has been delivered.
    pub fn dispatch_then<F>(&self, action: impl Into<Action>, callback: F)
    where
        F: FnOnce(&Store),
    {
        let action = action.into();
        log::debug!("dispatching {}", action.kind());

        for (key, reducer) in self.reducers.iter() {
            let current = self.state.borrow().get(key).cloned();
            let next = reducer.reduce(Some(&action), current.as_ref());
            if current.as_ref() == Some(&next) {
                continue;
            }

            log::trace!("{} changed {}", action.kind(), key);
            self.state.borrow_mut().insert(key.clone(), next);
            self.notify(key, &action);
        }

        callback(self);
    }

    /// Subscribe to every future change.
    pub fn subscribe(&self, listener: Rc<dyn Listener>) -> SubscriptionId {
        self.register(listener, None)
    }

    /// Subscribe to changes of selected top-level keys only.
    ///
    /// `selector` runs once, now, against the current state and returns the
    /// keys of interest. The listener then receives a view scoped to the
    /// changed key instead of the whole tree.
    pub fn subscribe_with<S, I>(&self, listener: Rc<dyn Listener>, selector: S) -> SubscriptionId
    where
        S: FnOnce(&StateView) -> I,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let keys: HashSet<String> = selector(&self.state()).into_iter().map(Into::into).collect();
        self.register(listener, Some(Rc::new(keys)))
    }

    fn register(
        &self,
        listener: Rc<dyn Listener>,
        keys: Option<Rc<HashSet<String>>>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        log::debug!("subscribed {:?} (keys: {:?})", id, keys.as_deref());

        self.listeners.borrow_mut().push(Subscription { id, listener, keys });
        id
    }

    /// Remove every subscription held by `listener`.
    ///
    /// Returns how many were removed; abandoning an unknown listener is a
    /// no-op.
    pub fn abandon<L>(&self, listener: &Rc<L>) -> usize
    where
        L: Listener + ?Sized,
    {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|sub| !sub.belongs_to(listener));

        let removed = before - listeners.len();
        if removed > 0 {
            self.bump_revision();
            log::debug!("abandoned {} subscription(s)", removed);
        }
        removed
    }

    /// Remove a single subscription. Returns whether it was still present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|sub| sub.id != id);

        let removed = before != listeners.len();
        if removed {
            self.bump_revision();
        }
        removed
    }

    fn bump_revision(&self) {
        self.revision.set(self.revision.get().wrapping_add(1));
    }

    /// A fresh snapshot of the whole state tree.
    pub fn state(&self) -> StateView {
        StateView::new(self.state.borrow().clone())
    }

    /// Copy of one top-level sub-state.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.borrow().get(key).cloned()
    }

    /// Snapshot of one top-level sub-state.
    ///
    /// A mapping is viewed directly; any other value is viewed as
    /// `{ key: value }`.
    pub fn view(&self, key: &str) -> Option<StateView> {
        let state = self.state.borrow();
        let view = match state.get(key)? {
            Value::Object(map) => StateView::new(map.clone()),
            other => {
                let mut wrapped = Map::new();
                wrapped.insert(key.to_string(), other.clone());
                StateView::new(wrapped)
            }
        };
        Some(view)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|(key, _)| key.as_str())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver the change of `key` to interested listeners.
    ///
    /// Works on a snapshot of the listener list: subscriptions added during
    /// the round wait for the next change, subscriptions removed during the
    /// round are skipped.
    fn notify(&self, key: &str, action: &Action) {
        let round: Vec<Subscription> = self.listeners.borrow().clone();
        let mut revision = self.revision.get();
        let mut live: Option<HashSet<SubscriptionId>> = None;

        for sub in round.iter().filter(|sub| sub.wants(key)) {
            // Only rebuild the live set after a removal.
            if self.revision.get() != revision {
                revision = self.revision.get();
                live = Some(self.listeners.borrow().iter().map(|sub| sub.id).collect());
            }
            if live.as_ref().is_some_and(|live| !live.contains(&sub.id)) {
                continue;
            }

            let view = if sub.is_scoped() {
                self.view(key).unwrap_or_default()
            } else {
                self.state()
            };
            log::trace!("notifying {:?} of {}", sub.id, key);
            sub.listener.state_changed(&view, Some(action.kind()));
        }
    }
}

fn validate(bindings: &[Binding]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for (key, _) in bindings {
        if key.is_empty() {
            return Err(ConfigurationError::EmptyKey);
        }
        if key.contains('.') {
            return Err(ConfigurationError::InvalidKey { key: key.clone() });
        }
        if !seen.insert(key.as_str()) {
            return Err(ConfigurationError::DuplicateKey { key: key.clone() });
        }
    }
    Ok(())
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            reducers: Rc::clone(&self.reducers),
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
            revision: Rc::clone(&self.revision),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
