//! Key path protocol: locating a collection key inside an action record.
//!
//! A [`KeyPath`] reads the key out of an action and writes a key into one,
//! and is used symmetrically by the collection reducer (read) and by action
//! decoration (read-before-write). Two implementations are provided:
//! [`Lens`], an accessor/mutator pair over a typed action -- the preferred,
//! shape-safe form -- and [`JsonPath`], a parsed dotted/indexed path
//! expression over [`serde_json::Value`] actions for heterogeneous action
//! shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InvalidPath;

/// Locates a collection key within an action record.
///
/// # Contract
///
/// - [`read`](KeyPath::read) must be a pure, non-mutating inspection.
///   `None` means the action carries no key at this path; the collection
///   reducer treats such actions as not addressed to it.
/// - [`write`](KeyPath::write) takes the action by value and returns the
///   keyed action. Implementations must never mutate shared data; the
///   move-in/move-out signature makes the copy-then-set explicit.
/// - Reading back a written key must return that key (`read(write(a, k))
///   == Some(k)` for any `a`).
pub trait KeyPath<A> {
    /// The key type this path extracts.
    type Key: Clone;

    /// Extract the key from `action`, if one is present at this path.
    fn read(&self, action: &A) -> Option<Self::Key>;

    /// Return `action` with `key` written at this path.
    fn write(&self, action: A, key: &Self::Key) -> A;
}

/// A shape-safe key path for typed actions: one accessor and one mutator.
///
/// Function pointers keep the lens `Copy` and free of captured state.
///
/// # Examples
///
/// ```
/// use keyfold::{KeyPath, Lens};
///
/// #[derive(Debug)]
/// struct SetPrice {
///     vin: Option<String>,
///     price: u32,
/// }
///
/// let vin: Lens<SetPrice, String> = Lens::new(
///     |action| action.vin.clone(),
///     |action, key| action.vin = Some(key),
/// );
///
/// let keyed = vin.write(SetPrice { vin: None, price: 30_000 }, &"5678".to_string());
/// assert_eq!(vin.read(&keyed).as_deref(), Some("5678"));
/// ```
pub struct Lens<A, K> {
    get: fn(&A) -> Option<K>,
    set: fn(&mut A, K),
}

impl<A, K> Lens<A, K> {
    /// Build a lens from an accessor and a mutator.
    pub const fn new(get: fn(&A) -> Option<K>, set: fn(&mut A, K)) -> Self {
        Self { get, set }
    }
}

impl<A, K> Clone for Lens<A, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A, K> Copy for Lens<A, K> {}

impl<A, K> fmt::Debug for Lens<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens").finish_non_exhaustive()
    }
}

impl<A, K: Clone> KeyPath<A> for Lens<A, K> {
    type Key = K;

    fn read(&self, action: &A) -> Option<K> {
        (self.get)(action)
    }

    fn write(&self, action: A, key: &K) -> A {
        let mut action = action;
        (self.set)(&mut action, key.clone());
        action
    }
}

/// A collection key extracted from a JSON action: a string or an integer.
///
/// JSON `null`, booleans, floats, containers, and empty strings are not
/// keys; [`Key::from_value`] maps them to `None` and the reducer treats
/// the action as unaddressed. Integer `0` is a valid key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// An integer key.
    Int(i64),
    /// A non-empty string key.
    Str(String),
}

impl Key {
    /// Interpret a JSON value as a key, if it has a key shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Key::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(Key::Int),
            _ => None,
        }
    }

    /// Render the key back into a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Str(s) => Value::String(s.clone()),
            Key::Int(n) => Value::Number((*n).into()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

/// One step of a parsed [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Object field access (`"payload"` in `"payload.vin"`).
    Field(String),
    /// Array index access (`0` in `"items[0].id"`).
    Index(usize),
}

/// A parsed dotted/indexed path expression over [`serde_json::Value`]
/// actions, e.g. `"vin"`, `"payload.vin"`, or `"items[0].id"`.
///
/// This is the general fallback for heterogeneous action shapes; prefer
/// [`Lens`] when actions are typed. Parsing validates the expression up
/// front, so a constructed `JsonPath` never fails at use time.
///
/// # Examples
///
/// ```
/// use keyfold::{JsonPath, Key, KeyPath};
/// use serde_json::json;
///
/// let path = JsonPath::parse("payload.vin")?;
/// let action = json!({ "type": "SET_PRICE", "payload": { "vin": "5678" } });
/// assert_eq!(path.read(&action), Some(Key::from("5678")));
/// # Ok::<(), keyfold::InvalidPath>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse a path expression.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`] if the expression is empty, has an empty
    /// dot-separated segment, an unterminated index bracket, or a
    /// non-numeric index.
    pub fn parse(expr: &str) -> Result<Self, InvalidPath> {
        if expr.is_empty() {
            return Err(InvalidPath::Empty);
        }

        let mut segments = Vec::new();
        for chunk in expr.split('.') {
            if chunk.is_empty() {
                return Err(InvalidPath::EmptySegment);
            }

            let name_end = chunk.find('[').unwrap_or(chunk.len());
            if name_end > 0 {
                segments.push(Segment::Field(chunk[..name_end].to_string()));
            }

            // Zero or more `[n]` index accesses follow the field name.
            let mut rest = &chunk[name_end..];
            while !rest.is_empty() {
                if !rest.starts_with('[') {
                    return Err(InvalidPath::InvalidIndex(rest.to_string()));
                }
                let close = match rest.find(']') {
                    Some(pos) => pos,
                    None => return Err(InvalidPath::UnterminatedIndex),
                };
                let digits = &rest[1..close];
                let index: usize = digits
                    .parse()
                    .map_err(|_| InvalidPath::InvalidIndex(digits.to_string()))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
            }
        }

        Ok(Self { segments })
    }

    /// Shorthand for a single top-level field, bypassing the parser.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Field(name.into())],
        }
    }

    /// Descend one segment for writing, creating missing containers.
    ///
    /// Field segments materialize objects, index segments materialize
    /// arrays padded with `null`. A non-container intermediate is
    /// replaced.
    fn slot<'a>(current: &'a mut Value, segment: &Segment) -> &'a mut Value {
        match segment {
            Segment::Field(name) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                match current {
                    Value::Object(map) => map.entry(name.as_str()).or_insert(Value::Null),
                    _ => unreachable!("replaced with an object above"),
                }
            }
            Segment::Index(index) => {
                if !current.is_array() {
                    *current = Value::Array(Vec::new());
                }
                match current {
                    Value::Array(items) => {
                        while items.len() <= *index {
                            items.push(Value::Null);
                        }
                        &mut items[*index]
                    }
                    _ => unreachable!("replaced with an array above"),
                }
            }
        }
    }
}

impl std::str::FromStr for JsonPath {
    type Err = InvalidPath;

    fn from_str(expr: &str) -> Result<Self, InvalidPath> {
        Self::parse(expr)
    }
}

impl KeyPath<Value> for JsonPath {
    type Key = Key;

    fn read(&self, action: &Value) -> Option<Key> {
        let mut current = action;
        for segment in &self.segments {
            current = match segment {
                Segment::Field(name) => current.get(name.as_str())?,
                Segment::Index(index) => current.get(*index)?,
            };
        }
        Key::from_value(current)
    }

    fn write(&self, action: Value, key: &Key) -> Value {
        let mut root = action;
        let mut current = &mut root;
        for segment in &self.segments {
            current = Self::slot(current, segment);
        }
        *current = key.to_value();
        root
    }
}
