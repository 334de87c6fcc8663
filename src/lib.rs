//! Lift a single-entity reducer, its selectors, and its action creators
//! over a keyed persistent collection -- and bind them back to one key.
//!
//! Actions are routed to the right entity by reading a key out of them
//! through a [`KeyPath`]; the symmetric decoration protocol writes the
//! key into actions (and into everything a deferred action dispatches)
//! so per-entity code never needs to know it lives in a collection.

mod action;
pub use action::{Action, DispatchFn, GetStateFn, Thunk};
mod collection;
pub use collection::{Collection, CollectionState};
mod creator;
pub use creator::{
    bind_collected_action, bind_collected_actions, collect_action, collect_action_with,
    collect_actions, collect_actions_with,
};
mod error;
pub use error::InvalidPath;
mod path;
pub use path::{JsonPath, Key, KeyPath, Lens};
mod reducer;
pub use reducer::collect_reducer;
mod selector;
pub use selector::{
    bind_selector, bind_selectors, collect_selector, collect_selectors, BoundSelectorMap,
    SelectorMap, SelectorSet,
};
