//! Lifting single-entity selectors over a collection, and binding them
//! back to one key.
//!
//! A collected selector takes `(state, key, ...)` and returns `None` when
//! the key has no entry -- absence is a value, not an error. Binding fixes
//! the key back in, recovering a single-entity-shaped read interface. The
//! variadic argument tail of the source language becomes one generic
//! `Args` parameter (unit, or a tuple for several).

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::collection::CollectionState;

/// Wrap a single-entity selector into a collection-aware one.
///
/// # Examples
///
/// ```
/// use keyfold::{collect_selector, CollectionState};
///
/// let price = |car: &(String, u32), _: &()| car.1;
/// let collected = collect_selector(price);
///
/// let state: CollectionState<String, (String, u32)> =
///     [("5678".to_string(), ("mustang".to_string(), 25_186))].into_iter().collect();
/// assert_eq!(collected(&state, &"5678".to_string(), &()), Some(25_186));
/// assert_eq!(collected(&state, &"0000".to_string(), &()), None);
/// ```
pub fn collect_selector<K, V, Args, R, S>(
    selector: S,
) -> impl Fn(&CollectionState<K, V>, &K, &Args) -> Option<R> + Clone
where
    S: Fn(&V, &Args) -> R + Clone,
    K: Hash + Eq + Clone,
    V: Clone,
{
    move |state, key, args| state.get(key).map(|entity| selector(entity, args))
}

/// Apply [`collect_selector`] to every entry of a named selector mapping,
/// preserving names. All selectors in one mapping share a signature.
pub fn collect_selectors<K, V, Args, R, S>(
    selectors: HashMap<String, S>,
) -> HashMap<String, impl Fn(&CollectionState<K, V>, &K, &Args) -> Option<R> + Clone>
where
    S: Fn(&V, &Args) -> R + Clone,
    K: Hash + Eq + Clone,
    V: Clone,
{
    selectors
        .into_iter()
        .map(|(name, selector)| (name, collect_selector(selector)))
        .collect()
}

/// Fix `key` into a collection-aware selector, un-doing the key
/// parameter.
pub fn bind_selector<K, V, Args, Out, S>(
    selector: S,
    key: K,
) -> impl Fn(&CollectionState<K, V>, &Args) -> Out + Clone
where
    S: Fn(&CollectionState<K, V>, &K, &Args) -> Out + Clone,
    K: Clone,
{
    move |state, args| selector(state, &key, args)
}

/// Apply [`bind_selector`] to every entry of a named selector mapping,
/// preserving names.
pub fn bind_selectors<K, V, Args, Out, S>(
    selectors: HashMap<String, S>,
    key: K,
) -> HashMap<String, impl Fn(&CollectionState<K, V>, &Args) -> Out + Clone>
where
    S: Fn(&CollectionState<K, V>, &K, &Args) -> Out + Clone,
    K: Clone,
{
    selectors
        .into_iter()
        .map(|(name, selector)| (name, bind_selector(selector, key.clone())))
        .collect()
}

/// A set of collection-aware selectors that can be bound to one key.
///
/// This is the seam [`collect_action_with`](crate::collect_action_with)
/// uses to hand thunks a single-entity read interface: the wrapper binds
/// the set to the decorated key and passes `Self::Bound` as the thunk's
/// third argument.
///
/// Implement this for a domain selector struct to keep the bound shape
/// fully typed, or use [`SelectorMap`] for the dynamic name-preserving
/// form.
pub trait SelectorSet<K> {
    /// The single-entity-shaped selector set produced by binding.
    type Bound;

    /// Fix `key` into every selector of the set.
    fn bind(&self, key: &K) -> Self::Bound;
}

type DynSelector<K, V, Args, Out> = Arc<dyn Fn(&CollectionState<K, V>, &K, &Args) -> Out>;
type DynBoundSelector<K, V, Args, Out> = Arc<dyn Fn(&CollectionState<K, V>, &Args) -> Out>;

/// A named mapping of uniform-signature collection-aware selectors,
/// bindable to one key via [`SelectorSet`].
///
/// Coherence rules prevent implementing [`SelectorSet`] for a bare
/// `HashMap` of closures, so the dynamic form is this concrete struct.
pub struct SelectorMap<K, V, Args, Out> {
    selectors: HashMap<String, DynSelector<K, V, Args, Out>>,
}

impl<K, V, Args, Out> SelectorMap<K, V, Args, Out> {
    /// An empty selector map.
    pub fn new() -> Self {
        Self {
            selectors: HashMap::new(),
        }
    }

    /// Add a named selector, builder style.
    pub fn with<S>(mut self, name: impl Into<String>, selector: S) -> Self
    where
        S: Fn(&CollectionState<K, V>, &K, &Args) -> Out + 'static,
    {
        self.selectors.insert(name.into(), Arc::new(selector));
        self
    }

    /// Number of named selectors.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the map holds no selectors.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl<K, V, Args, Out> Default for SelectorMap<K, V, Args, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, Args, Out> Clone for SelectorMap<K, V, Args, Out> {
    fn clone(&self) -> Self {
        Self {
            selectors: self.selectors.clone(),
        }
    }
}

impl<K, V, Args, Out> SelectorSet<K> for SelectorMap<K, V, Args, Out>
where
    K: Clone + 'static,
    V: 'static,
    Args: 'static,
    Out: 'static,
{
    type Bound = BoundSelectorMap<K, V, Args, Out>;

    fn bind(&self, key: &K) -> Self::Bound {
        let selectors = self
            .selectors
            .iter()
            .map(|(name, selector)| {
                let selector = Arc::clone(selector);
                let key = key.clone();
                let bound: DynBoundSelector<K, V, Args, Out> =
                    Arc::new(move |state, args| selector(state, &key, args));
                (name.clone(), bound)
            })
            .collect();
        BoundSelectorMap { selectors }
    }
}

/// A [`SelectorMap`] with the key fixed into every selector.
pub struct BoundSelectorMap<K, V, Args, Out> {
    selectors: HashMap<String, DynBoundSelector<K, V, Args, Out>>,
}

impl<K, V, Args, Out> BoundSelectorMap<K, V, Args, Out> {
    /// Run the named selector against `state`. `None` if no selector is
    /// registered under `name`.
    pub fn select(&self, name: &str, state: &CollectionState<K, V>, args: &Args) -> Option<Out> {
        self.selectors
            .get(name)
            .map(|selector| selector(state, args))
    }
}

impl<K, V, Args, Out> Clone for BoundSelectorMap<K, V, Args, Out> {
    fn clone(&self) -> Self {
        Self {
            selectors: self.selectors.clone(),
        }
    }
}
