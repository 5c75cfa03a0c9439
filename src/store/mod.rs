//! The store: reducers, actions, listeners and the dispatch loop.
//!
//! A [`Store`] owns the canonical state tree. Each top-level key belongs to
//! exactly one [`Reducer`]; dispatching an [`Action`] runs every reducer and
//! tells each interested [`Listener`] about the keys that changed.

mod action;
mod listener;
mod reducer;
mod store;

pub use action::Action;
pub use listener::{Listener, SubscriptionId};
pub use reducer::{merge, Reducer};
pub use store::{Store, StoreBuilder, WeakStore};
