//! Collected action creators: decorating plain and deferred actions with
//! a collection key.
//!
//! Decoration is the routing half of the collection protocol. A plain
//! record gets the key written at the configured path (read-before-write:
//! a key the inner creator already supplied wins). A deferred action is
//! rewrapped so that everything it dispatches -- including further
//! deferred actions, to any nesting depth -- flows through the same
//! decoration before reaching the real dispatch, in the exact order
//! issued.

use std::collections::HashMap;

use crate::action::{Action, Thunk};
use crate::path::KeyPath;
use crate::selector::SelectorSet;

/// Write `key` into `record` at `path` unless a key is already present.
fn ensure_key<A, P: KeyPath<A>>(record: A, path: &P, key: &P::Key) -> A {
    if path.read(&record).is_some() {
        // The inner creator addressed the action itself; keep its key.
        tracing::debug!("action already carries a collection key; keeping it");
        record
    } else {
        path.write(record, key)
    }
}

/// Decorate one action with `key`: plain records get the key at `path`,
/// deferred actions are rewrapped so their dispatches inherit it.
fn decorate<A, St, Ctx, P>(action: Action<A, St, Ctx>, path: P, key: P::Key) -> Action<A, St, Ctx>
where
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    match action {
        Action::Plain(record) => Action::Plain(ensure_key(record, &path, &key)),
        Action::Deferred(thunk) => Action::Deferred(collect_thunk(thunk, path, key)),
    }
}

/// Wrap a thunk so every action it dispatches is decorated with `key`
/// before being forwarded, preserving issue order.
fn collect_thunk<A, St, Ctx, P>(thunk: Thunk<A, St, Ctx>, path: P, key: P::Key) -> Thunk<A, St, Ctx>
where
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    Thunk::new(move |dispatch, get_state, ctx| {
        let mut decorated = move |inner: Action<A, St, Ctx>| {
            dispatch(decorate(inner, path.clone(), key.clone()));
        };
        thunk.run(&mut decorated, get_state, ctx)
    })
}

/// Decorate with a selector set: like [`decorate`], but a deferred action
/// additionally receives the selectors bound to `key` as its third
/// argument, in place of the store context.
fn decorate_with<A, St, Ctx, P, Sel>(
    action: Action<A, St, Sel::Bound>,
    path: P,
    key: P::Key,
    selectors: Sel,
) -> Action<A, St, Ctx>
where
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    Sel: SelectorSet<P::Key> + Clone + 'static,
    Sel::Bound: 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    match action {
        Action::Plain(record) => Action::Plain(ensure_key(record, &path, &key)),
        Action::Deferred(thunk) => {
            Action::Deferred(Thunk::new(move |dispatch, get_state, _ctx| {
                let bound = selectors.bind(&key);
                let mut decorated = move |inner: Action<A, St, Sel::Bound>| {
                    dispatch(decorate_with::<A, St, Ctx, P, Sel>(
                        inner,
                        path.clone(),
                        key.clone(),
                        selectors.clone(),
                    ));
                };
                thunk.run(&mut decorated, get_state, &bound)
            }))
        }
    }
}

/// Wrap an action creator so its result, given `(key, args)`, carries
/// `key` at `path`.
///
/// Works for creators of plain records and of deferred actions alike; a
/// deferred action's nested dispatches inherit the key automatically, so
/// the inner creator needs no awareness of collections.
///
/// # Examples
///
/// ```
/// use keyfold::{collect_action, Action, JsonPath, Key};
/// use serde_json::{json, Value};
///
/// let set_price = |price: u32| -> Action<Value> {
///     Action::Plain(json!({ "type": "SET_PRICE", "price": price }))
/// };
/// let collected = collect_action(set_price, JsonPath::field("vin"));
///
/// let action = collected(&Key::from("5678"), 30_000);
/// assert_eq!(
///     action.into_plain(),
///     Some(json!({ "type": "SET_PRICE", "price": 30_000, "vin": "5678" }))
/// );
/// ```
pub fn collect_action<A, St, Ctx, Args, P, C>(
    creator: C,
    path: P,
) -> impl Fn(&P::Key, Args) -> Action<A, St, Ctx> + Clone
where
    C: Fn(Args) -> Action<A, St, Ctx> + Clone,
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    move |key, args| decorate(creator(args), path.clone(), key.clone())
}

/// Like [`collect_action`], but deferred actions additionally receive
/// `selectors` bound to the key as their third argument, letting thunks
/// read their own entity through collection-unaware selector signatures.
///
/// `get_state` is forwarded to the inner thunk unchanged; only the third
/// argument is replaced.
pub fn collect_action_with<A, St, Ctx, Args, P, C, Sel>(
    creator: C,
    path: P,
    selectors: Sel,
) -> impl Fn(&P::Key, Args) -> Action<A, St, Ctx> + Clone
where
    C: Fn(Args) -> Action<A, St, Sel::Bound> + Clone,
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    Sel: SelectorSet<P::Key> + Clone + 'static,
    Sel::Bound: 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    move |key, args| decorate_with(creator(args), path.clone(), key.clone(), selectors.clone())
}

/// Apply [`collect_action`] to every entry of a named creator mapping,
/// preserving names. All creators in one mapping share a signature.
pub fn collect_actions<A, St, Ctx, Args, P, C>(
    creators: HashMap<String, C>,
    path: P,
) -> HashMap<String, impl Fn(&P::Key, Args) -> Action<A, St, Ctx> + Clone>
where
    C: Fn(Args) -> Action<A, St, Ctx> + Clone,
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    creators
        .into_iter()
        .map(|(name, creator)| (name, collect_action(creator, path.clone())))
        .collect()
}

/// Apply [`collect_action_with`] to every entry of a named creator
/// mapping, preserving names.
pub fn collect_actions_with<A, St, Ctx, Args, P, C, Sel>(
    creators: HashMap<String, C>,
    path: P,
    selectors: Sel,
) -> HashMap<String, impl Fn(&P::Key, Args) -> Action<A, St, Ctx> + Clone>
where
    C: Fn(Args) -> Action<A, St, Sel::Bound> + Clone,
    P: KeyPath<A> + Clone + 'static,
    P::Key: Clone + 'static,
    Sel: SelectorSet<P::Key> + Clone + 'static,
    Sel::Bound: 'static,
    A: 'static,
    St: 'static,
    Ctx: 'static,
{
    creators
        .into_iter()
        .map(|(name, creator)| {
            (
                name,
                collect_action_with(creator, path.clone(), selectors.clone()),
            )
        })
        .collect()
}

/// Fix `key` as the first argument of a collected action creator,
/// recovering a single-entity-shaped creator.
pub fn bind_collected_action<K, Args, Out, C>(creator: C, key: K) -> impl Fn(Args) -> Out + Clone
where
    C: Fn(&K, Args) -> Out + Clone,
    K: Clone,
{
    move |args| creator(&key, args)
}

/// Apply [`bind_collected_action`] to every entry of a named creator
/// mapping, preserving names.
pub fn bind_collected_actions<K, Args, Out, C>(
    creators: HashMap<String, C>,
    key: K,
) -> HashMap<String, impl Fn(Args) -> Out + Clone>
where
    C: Fn(&K, Args) -> Out + Clone,
    K: Clone,
{
    creators
        .into_iter()
        .map(|(name, creator)| (name, bind_collected_action(creator, key.clone())))
        .collect()
}
