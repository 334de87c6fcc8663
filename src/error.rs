//! Crate-level error types for key path construction.

/// Error returned when a key path expression cannot be parsed.
///
/// This is the only error the crate defines: every other operation is a
/// total function over well-typed inputs. A missing key is a normal
/// (non-error) outcome -- selectors return `None` and the collection
/// reducer passes state through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPath {
    /// The path expression was empty.
    #[error("key path must not be empty")]
    Empty,

    /// A dot-separated segment of the path was empty (e.g. `"a..b"`).
    #[error("key path has an empty segment")]
    EmptySegment,

    /// An index bracket was opened but never closed (e.g. `"items[0"`).
    #[error("unterminated '[' index in key path")]
    UnterminatedIndex,

    /// An index bracket held something other than an unsigned integer,
    /// or a segment had trailing characters after a bracket.
    #[error("invalid index {0:?} in key path")]
    InvalidIndex(String),
}
