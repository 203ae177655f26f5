//! Shape descriptors for decode targets.
//!
//! A [`Shape`] describes the statically known layout of a destination
//! value: the scalar kind it holds, the element shape of a sequence or
//! mapping, or the closed field table of a record. The decode engine
//! consumes shapes; the encode engine walks values directly and needs
//! none.
//!
//! Shapes are built once per target type, by hand or by whatever
//! registration mechanism the caller prefers, and passed by reference to
//! every decode call.

/// Scalar kinds the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Signed base-10 integer at a declared bit width (32 or 64).
    Int {
        /// Declared width; the decoder rejects anything but 32 or 64.
        bits: u32,
    },
    /// 64-bit floating-point number.
    Float,
    /// Boolean, written exactly `true` or `false` (case-sensitive).
    Bool,
    /// UTF-8 text, single line or block scalar.
    Text,
}

/// Description of one decode target.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A single scalar of the given kind.
    Scalar(ScalarKind),
    /// An ordered list of `-`-prefixed entries, all of one shape.
    Sequence(Box<Shape>),
    /// Arbitrary keys mapping to values of one shape.
    Mapping(Box<Shape>),
    /// A closed, ordered field table; unknown keys are a decode error.
    Record(Vec<Field>),
}

impl Shape {
    /// 32-bit signed integer scalar.
    pub fn int32() -> Shape {
        Shape::Scalar(ScalarKind::Int { bits: 32 })
    }

    /// 64-bit signed integer scalar.
    pub fn int64() -> Shape {
        Shape::Scalar(ScalarKind::Int { bits: 64 })
    }

    /// 64-bit floating-point scalar.
    pub fn float() -> Shape {
        Shape::Scalar(ScalarKind::Float)
    }

    /// Boolean scalar.
    pub fn boolean() -> Shape {
        Shape::Scalar(ScalarKind::Bool)
    }

    /// Text scalar.
    pub fn text() -> Shape {
        Shape::Scalar(ScalarKind::Text)
    }

    /// Sequence of `elem`-shaped entries.
    pub fn sequence(elem: Shape) -> Shape {
        Shape::Sequence(Box::new(elem))
    }

    /// Mapping with `elem`-shaped values.
    pub fn mapping(elem: Shape) -> Shape {
        Shape::Mapping(Box::new(elem))
    }

    /// Record with the given field table.
    pub fn record(fields: Vec<Field>) -> Shape {
        Shape::Record(fields)
    }
}

/// One record field: resolved wire name, omit flag, and value shape.
///
/// Only fields placed in the table exist as far as the engines are
/// concerned; a caller that wants to hide a field simply leaves it out.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name as it appears in the document.
    pub name: String,
    /// Skip the field when encoding if its value is an empty sequence,
    /// mapping, or text.
    pub omit_empty: bool,
    /// Shape of the field's value.
    pub shape: Shape,
}

impl Field {
    /// Field whose wire name is its own identifier, omit-if-empty off.
    pub fn new(name: &str, shape: Shape) -> Field {
        Field {
            name: name.to_string(),
            omit_empty: false,
            shape,
        }
    }

    /// Field with a `wire[,omitempty]` naming directive.
    ///
    /// The text before the first comma renames the field on the wire; an
    /// empty name keeps the field's own identifier. The flag list after
    /// the comma may contain `omitempty`.
    pub fn with_directive(name: &str, directive: &str, shape: Shape) -> Field {
        let (wire, flags) = match directive.split_once(',') {
            Some((wire, flags)) => (wire, flags),
            None => (directive, ""),
        };
        Field {
            name: if wire.is_empty() { name } else { wire }.to_string(),
            omit_empty: flags.split(',').any(|flag| flag == "omitempty"),
            shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_rename() {
        let f = Field::with_directive("Port", "port", Shape::int32());
        assert_eq!(f.name, "port");
        assert!(!f.omit_empty);
    }

    #[test]
    fn test_directive_rename_and_omit() {
        let f = Field::with_directive("Tags", "tags,omitempty", Shape::sequence(Shape::text()));
        assert_eq!(f.name, "tags");
        assert!(f.omit_empty);
    }

    #[test]
    fn test_directive_omit_only() {
        let f = Field::with_directive("Tags", ",omitempty", Shape::sequence(Shape::text()));
        assert_eq!(f.name, "Tags");
        assert!(f.omit_empty);
    }

    #[test]
    fn test_directive_empty_defaults() {
        let f = Field::with_directive("Tags", "", Shape::text());
        assert_eq!(f.name, "Tags");
        assert!(!f.omit_empty);
    }

    #[test]
    fn test_directive_unknown_flag_ignored() {
        let f = Field::with_directive("Tags", "tags,omitemptyish", Shape::text());
        assert_eq!(f.name, "tags");
        assert!(!f.omit_empty);
    }
}
