use crate::view::StateView;
use std::collections::HashSet;
use std::rc::Rc;

/// Receives state change notifications from a [`Store`](crate::Store).
///
/// `state_changed` is optional: the default body ignores the notification,
/// so a type that never overrides it is registered but silently skipped.
pub trait Listener {
    /// Called once per changed top-level key.
    ///
    /// `state` is the whole tree for unscoped subscriptions, or the changed
    /// key's sub-state for subscriptions with an interest set. `action` is the
    /// type of the action that caused the change.
    fn state_changed(&self, _state: &StateView, _action: Option<&str>) {}
}

impl<F> Listener for F
where
    F: Fn(&StateView, Option<&str>),
{
    fn state_changed(&self, state: &StateView, action: Option<&str>) {
        self(state, action)
    }
}

/// Handle identifying one subscription record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) usize);

#[derive(Clone)]
pub(crate) struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) listener: Rc<dyn Listener>,
    pub(crate) keys: Option<Rc<HashSet<String>>>,
}

impl Subscription {
    pub(crate) fn wants(&self, key: &str) -> bool {
        self.keys.as_ref().map_or(true, |keys| keys.contains(key))
    }

    pub(crate) fn is_scoped(&self) -> bool {
        self.keys.is_some()
    }

    // Compares data pointers only, so a listener registered as
    // `Rc<dyn Listener>` matches the concrete `Rc<T>` it was created from.
    pub(crate) fn belongs_to<L: Listener + ?Sized>(&self, listener: &Rc<L>) -> bool {
        Rc::as_ptr(&self.listener).cast::<()>() == Rc::as_ptr(listener).cast::<()>()
    }
}
