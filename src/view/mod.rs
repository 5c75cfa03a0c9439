//! Read-only, navigable snapshots of state.
//!
//! Every read of the store goes through a [`StateView`]: a copy of a mapping
//! that hands out nested mappings as further views and everything else as
//! plain JSON values.

mod view;

pub use view::{Node, StateView};
