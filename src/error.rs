//! Error types for decoding and encoding.

use thiserror::Error;

/// Result type for yamlet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for yamlet operations.
///
/// Decode-side variants carry the byte offset at which the problem was
/// detected and the nearest enclosing key or field name (`field` is empty
/// at the document root). An error aborts the whole decode; no partial
/// result is returned.
#[derive(Error, Debug)]
pub enum Error {
    /// Input text does not match the requested shape.
    #[error("{field}: {detail} at byte {offset}")]
    ShapeMismatch {
        /// Nearest enclosing key or field name.
        field: String,
        /// What was expected or found.
        detail: String,
        /// Byte offset where the mismatch was detected.
        offset: usize,
    },

    /// A mapping key has no corresponding record field.
    #[error("{field}: undefined field {key} at byte {offset}")]
    UnknownField {
        /// Nearest enclosing key or field name.
        field: String,
        /// The key that matched no record field.
        key: String,
        /// Byte offset where the key was read.
        offset: usize,
    },

    /// Text cannot be parsed as the requested scalar kind.
    #[error("{field}: {detail} at byte {offset}")]
    MalformedScalar {
        /// Nearest enclosing key or field name.
        field: String,
        /// Why the scalar failed to parse.
        detail: String,
        /// Byte offset just past the scalar text.
        offset: usize,
    },

    /// Quoted key has no closing quote, an invalid escape, or trailing
    /// garbage before the colon.
    #[error("{field}: {detail} at byte {offset}")]
    MalformedQuotedKey {
        /// Nearest enclosing key or field name.
        field: String,
        /// Why the key failed to parse.
        detail: String,
        /// Byte offset where scanning stopped.
        offset: usize,
    },

    /// The shape descriptor names a kind the engine does not implement.
    #[error("{field}: unsupported shape: {detail}")]
    UnsupportedShape {
        /// Nearest enclosing key or field name.
        field: String,
        /// The unimplemented kind.
        detail: String,
    },

    /// File read or write failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
