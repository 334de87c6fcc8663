//! Lifting a single-entity reducer over a keyed collection.

use std::hash::Hash;

use crate::collection::{Collection, CollectionState};
use crate::path::KeyPath;

/// Turn a single-entity reducer into a reducer over a keyed collection.
///
/// The entity reducer sees `(current_entity, action)` where the current
/// entity is `None` for a key with no entry yet; returning `None` removes
/// the key from the collection and returning `Some` stores the next
/// entity state under it. Which entity an action addresses is read from
/// the action via `path`.
///
/// # Contract
///
/// - The input state is normalized first, so a plain deserialized mapping
///   and its hydrated equivalent behave identically.
/// - An action carrying no key at `path` is not addressed to this
///   collection: the normalized state is returned unchanged.
/// - The reducer must be pure; the collection layer never inspects entity
///   values and never mutates its input.
///
/// # Examples
///
/// ```
/// use keyfold::{collect_reducer, CollectionState, JsonPath};
/// use serde_json::{json, Value};
///
/// let tally = |count: Option<&u32>, action: &Value| match action["type"].as_str() {
///     Some("INCR") => Some(count.copied().unwrap_or(0) + 1),
///     Some("RESET") => None,
///     _ => count.copied(),
/// };
/// let tallies = collect_reducer(tally, JsonPath::field("name"));
///
/// let state = tallies(CollectionState::empty(), &json!({ "type": "INCR", "name": "a" }));
/// assert_eq!(state.get(&"a".into()), Some(&1));
/// ```
pub fn collect_reducer<A, K, V, R, P>(
    reducer: R,
    path: P,
) -> impl Fn(CollectionState<K, V>, &A) -> Collection<K, V>
where
    R: Fn(Option<&V>, &A) -> Option<V>,
    P: KeyPath<A, Key = K>,
    K: Hash + Eq + Clone,
    V: Clone,
{
    move |state, action| {
        let collection = state.into_collection();

        let key = match path.read(action) {
            Some(key) => key,
            None => {
                // Not addressed to this collection.
                tracing::trace!("action carries no collection key; state unchanged");
                return collection;
            }
        };

        match reducer(collection.get(&key), action) {
            Some(next) => collection.update(key, next),
            None => collection.without(&key),
        }
    }
}

/// Shared car-collection fixture, mirrored by the integration tests.
#[cfg(test)]
pub(crate) mod test_fixtures {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::action::Action;
    use crate::collection::{Collection, CollectionState};
    use crate::path::{JsonPath, Key};
    use crate::selector::SelectorSet;

    use super::collect_reducer;

    /// A car keyed by its Vehicle Identification Number.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub(crate) struct Car {
        pub model: String,
        pub price: u32,
        pub vin: String,
    }

    pub(crate) fn jaguar() -> Car {
        Car {
            model: "jaguar".to_string(),
            price: 50_350,
            vin: "1234".to_string(),
        }
    }

    pub(crate) fn mustang() -> Car {
        Car {
            model: "mustang".to_string(),
            price: 25_186,
            vin: "5678".to_string(),
        }
    }

    /// Reducer for a single car. Returning `None` signals removal (or,
    /// for an unknown action on an absent car, "do not add an entry").
    pub(crate) fn car_reducer(state: Option<&Car>, action: &Value) -> Option<Car> {
        match action.get("type").and_then(Value::as_str) {
            Some("ADD") => serde_json::from_value(action["car"].clone()).ok(),
            Some("SET_PRICE") => state.map(|car| Car {
                price: action["price"].as_u64().unwrap_or(car.price as u64) as u32,
                ..car.clone()
            }),
            Some("REMOVE") => None,
            _ => state.cloned(),
        }
    }

    pub(crate) type CarState = CollectionState<Key, Car>;
    pub(crate) type CarEnvelope = Action<Value, CarState, ()>;

    /// Typed selector set for cars; bound to one VIN for use as a thunk
    /// context.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct CarSelectors;

    #[derive(Debug, Clone)]
    pub(crate) struct BoundCarSelectors {
        key: Key,
    }

    impl SelectorSet<Key> for CarSelectors {
        type Bound = BoundCarSelectors;

        fn bind(&self, key: &Key) -> BoundCarSelectors {
            BoundCarSelectors { key: key.clone() }
        }
    }

    impl BoundCarSelectors {
        pub(crate) fn price(&self, state: &CarState) -> Option<u32> {
            state.get(&self.key).map(|car| car.price)
        }

        pub(crate) fn is_model(&self, state: &CarState, model: &str) -> Option<bool> {
            state.get(&self.key).map(|car| car.model == model)
        }
    }

    /// Minimal synchronous store: applies plain actions through the
    /// collected car reducer, runs deferred ones, and logs every plain
    /// action in dispatch order.
    pub(crate) struct CarStore {
        state: RefCell<Collection<Key, Car>>,
        log: RefCell<Vec<Value>>,
        reducer: Box<dyn Fn(CarState, &Value) -> Collection<Key, Car>>,
    }

    impl CarStore {
        pub(crate) fn new() -> Self {
            Self::hydrate(HashMap::new())
        }

        pub(crate) fn hydrate(initial: HashMap<Key, Car>) -> Self {
            let reducer = collect_reducer(car_reducer, JsonPath::field("vin"));
            Self {
                state: RefCell::new(CollectionState::Plain(initial).into_collection()),
                log: RefCell::new(Vec::new()),
                reducer: Box::new(reducer),
            }
        }

        pub(crate) fn state(&self) -> CarState {
            CollectionState::Hydrated(self.collection())
        }

        pub(crate) fn collection(&self) -> Collection<Key, Car> {
            self.state.borrow().clone()
        }

        pub(crate) fn dispatch(&self, action: CarEnvelope) {
            match action {
                Action::Plain(record) => {
                    self.log.borrow_mut().push(record.clone());
                    let next = (self.reducer)(self.state(), &record);
                    *self.state.borrow_mut() = next;
                }
                Action::Deferred(thunk) => {
                    let mut dispatch = |inner: CarEnvelope| self.dispatch(inner);
                    let get_state = || self.state();
                    thunk.run(&mut dispatch, &get_state, &());
                }
            }
        }

        /// Every plain action that reached the reducer, in dispatch order.
        pub(crate) fn log(&self) -> Vec<Value> {
            self.log.borrow().clone()
        }
    }
}
