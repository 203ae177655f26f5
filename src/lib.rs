//! A simplified YAML codec for configuration files.
//!
//! Only a subset of YAML is implemented: block mappings and sequences
//! with a fixed 2-space nesting increment, plain scalars, and `>`
//! (folded) / `|` (literal) block scalars. Decoding is driven by a
//! [`Shape`] describing the destination, so documents decode directly
//! into the layout a configuration struct expects; encoding walks the
//! value itself.
//!
//! Unsupported, by design:
//!
//! - document markers (`---`) and multi-document streams;
//! - flow/inline (bracket) notation;
//! - anchors, aliases, and tags;
//! - quoted scalar values (only mapping *keys* may be quoted);
//! - comments inside a block-scalar body, where `#` is ordinary text.
//!
//! Booleans are written exactly `true` or `false`, case-sensitive.
//!
//! # Example
//!
//! ```
//! use yamlet::{from_str, Field, Shape, Value};
//!
//! let shape = Shape::record(vec![
//!     Field::new("host", Shape::text()),
//!     Field::new("port", Shape::int32()),
//! ]);
//! let value = from_str("host: localhost\nport: 8080\n", &shape).unwrap();
//! assert_eq!(value.field("host").and_then(Value::as_text), Some("localhost"));
//! assert_eq!(value.field("port").and_then(Value::as_integer), Some(8080));
//! ```

mod cursor;
mod decode;
mod encode;
mod error;
mod shape;
mod value;

pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Error, Result};
pub use shape::{Field, ScalarKind, Shape};
pub use value::{RecordField, Value};

use std::fs;
use std::path::Path;

/// Decode a document from bytes into a value of the given shape.
pub fn from_slice(data: &[u8], shape: &Shape) -> Result<Value> {
    Decoder::new(data).decode(shape)
}

/// Decode a document from a string into a value of the given shape.
pub fn from_str(data: &str, shape: &Shape) -> Result<Value> {
    from_slice(data.as_bytes(), shape)
}

/// Encode a value to document bytes.
pub fn to_vec(value: &Value) -> Vec<u8> {
    Encoder::new().encode(value)
}

/// Encode a value to document text.
pub fn to_string(value: &Value) -> String {
    Encoder::new().encode_to_string(value)
}

/// Read a file and decode it into a value of the given shape.
pub fn read_file<P: AsRef<Path>>(path: P, shape: &Shape) -> Result<Value> {
    let data = fs::read(path)?;
    from_slice(&data, shape)
}

/// Encode a value and write it to a file.
pub fn write_file<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    fs::write(path, to_vec(value))?;
    Ok(())
}
