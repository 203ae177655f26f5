//! Encode engine: value to text with 2-space indentation.
//!
//! The encoder walks a value's own shape; no descriptor is needed. The
//! context passed down mirrors the decode side: it controls whether a
//! composite must open on a new line after `key:` and whether the first
//! entry of a composite shares a dash's line.

use crate::value::Value;

/// Where the value being emitted sits relative to its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Document root.
    Default,
    /// First content of a `- ` entry, sharing the dash's line.
    ListElement,
    /// Follows `key: ` on the same line.
    AfterColon,
}

/// Recursive encoder producing document text.
pub struct Encoder {
    buf: String,
}

impl Encoder {
    /// Encoder with an empty output buffer.
    pub fn new() -> Encoder {
        Encoder { buf: String::new() }
    }

    /// Discard any previously built output.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Encode a value, returning the document bytes.
    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.encode_to_string(value).into_bytes()
    }

    /// Encode a value, returning the document text.
    pub fn encode_to_string(&mut self, value: &Value) -> String {
        self.value(value, 0, Context::Default);
        std::mem::take(&mut self.buf)
    }

    fn value(&mut self, value: &Value, indent: usize, ctx: Context) {
        match value {
            Value::Integer(n) => {
                self.buf.push_str(&n.to_string());
                self.buf.push('\n');
            }
            Value::Float(f) => {
                self.buf.push_str(&f.to_string());
                self.buf.push('\n');
            }
            Value::Bool(b) => {
                self.buf.push_str(if *b { "true" } else { "false" });
                self.buf.push('\n');
            }
            Value::Text(s) => {
                self.text(s, indent);
                self.buf.push('\n');
            }
            Value::Sequence(items) => {
                if ctx == Context::AfterColon {
                    self.buf.push('\n');
                }
                for (i, item) in items.iter().enumerate() {
                    if i != 0 || ctx != Context::ListElement {
                        self.indent(indent);
                    }
                    self.buf.push_str("- ");
                    self.value(item, indent + 2, Context::ListElement);
                }
            }
            Value::Mapping(map) => {
                if ctx == Context::AfterColon {
                    self.buf.push('\n');
                }
                for (i, (key, item)) in map.iter().enumerate() {
                    if i != 0 || ctx != Context::ListElement {
                        self.indent(indent);
                    }
                    self.key(key);
                    self.buf.push_str(": ");
                    self.value(item, indent + 2, Context::AfterColon);
                }
            }
            Value::Record(fields) => {
                if ctx == Context::AfterColon {
                    self.buf.push('\n');
                }
                let mut need_indent = ctx != Context::ListElement;
                for field in fields {
                    if field.omit_empty && is_empty(&field.value) {
                        continue;
                    }
                    if need_indent {
                        self.indent(indent);
                    } else {
                        need_indent = true;
                    }
                    self.key(&field.name);
                    self.buf.push_str(": ");
                    self.value(&field.value, indent + 2, Context::AfterColon);
                }
            }
        }
    }

    /// Emit a key, quoting it when plain text would be ambiguous.
    fn key(&mut self, key: &str) {
        if needs_quoting(key) {
            self.quoted_key(key);
        } else {
            self.buf.push_str(key);
        }
    }

    fn quoted_key(&mut self, key: &str) {
        self.buf.push('"');
        for c in key.chars() {
            match c {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\t' => self.buf.push_str("\\t"),
                '\r' => self.buf.push_str("\\r"),
                c if c.is_control() => {
                    self.buf.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }

    /// Emit a text scalar. Empty text emits nothing; the structural
    /// newline still follows.
    fn text(&mut self, s: &str, indent: usize) {
        if s.is_empty() {
            return;
        }

        if !s.contains('\n') {
            // A `#` on the key's line would read back as a comment; move
            // the value to its own indented line.
            if s.contains('#') {
                self.buf.push('\n');
                self.indent(indent);
            }
            self.buf.push_str(s);
            return;
        }

        // A trailing newline becomes a folded-block marker so the decoder
        // restores it.
        let content = match s.strip_suffix('\n') {
            Some(stripped) => {
                self.buf.push('>');
                stripped
            }
            None => s,
        };
        self.buf.push('\n');

        // Each content line is followed by one blank line, which the
        // folded decode turns back into a line break. An originally blank
        // line stands for itself, so longer blank runs degrade.
        let lines: Vec<&str> = content.split('\n').collect();
        for (i, line) in lines.iter().enumerate() {
            let last = i + 1 == lines.len();
            if line.is_empty() {
                if !last {
                    self.buf.push('\n');
                }
                continue;
            }
            self.indent(indent);
            self.buf.push_str(line);
            if !last {
                self.buf.push_str("\n\n");
            }
        }
    }

    fn indent(&mut self, n: usize) {
        for _ in 0..n {
            self.buf.push(' ');
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

/// Empty in the omit-if-empty sense; only sequences, mappings, and text
/// can be empty.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

/// A key is quoted when it contains whitespace, control characters, `#`,
/// or `:`, or when it opens with a quote, since any of those would be
/// misread as structure on decode.
fn needs_quoting(key: &str) -> bool {
    key.starts_with('"')
        || key
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '#' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RecordField;

    fn encode_str(value: &Value) -> String {
        Encoder::new().encode_to_string(value)
    }

    #[test]
    fn test_scalar_lines() {
        assert_eq!(encode_str(&Value::Integer(42)), "42\n");
        assert_eq!(encode_str(&Value::Float(1.5)), "1.5\n");
        assert_eq!(encode_str(&Value::Bool(true)), "true\n");
        assert_eq!(encode_str(&Value::Text("abc".into())), "abc\n");
    }

    #[test]
    fn test_empty_text_emits_nothing() {
        assert_eq!(encode_str(&Value::Text(String::new())), "\n");
    }

    #[test]
    fn test_text_with_hash_moves_to_own_line() {
        let value = Value::Record(vec![RecordField::new("c", Value::Text("a#b".into()))]);
        assert_eq!(encode_str(&value), "c: \n  a#b\n");
    }

    #[test]
    fn test_text_trailing_newline_gets_marker() {
        let value = Value::Record(vec![RecordField::new("c", Value::Text("ab\ncd\n".into()))]);
        assert_eq!(encode_str(&value), "c: >\n  ab\n\n  cd\n");
    }

    #[test]
    fn test_text_without_trailing_newline_has_no_marker() {
        let value = Value::Record(vec![RecordField::new("c", Value::Text("ab\ncd".into()))]);
        assert_eq!(encode_str(&value), "c: \n  ab\n\n  cd\n");
    }

    #[test]
    fn test_key_quoting() {
        let mut map = indexmap::IndexMap::new();
        map.insert("odd key".to_string(), Value::Integer(1));
        assert_eq!(encode_str(&Value::Mapping(map)), "\"odd key\": 1\n");
    }

    #[test]
    fn test_plain_key_not_quoted() {
        let mut map = indexmap::IndexMap::new();
        map.insert("plain-key_1".to_string(), Value::Integer(1));
        assert_eq!(encode_str(&Value::Mapping(map)), "plain-key_1: 1\n");
    }

    #[test]
    fn test_sequence_of_sequences_shares_dash_line() {
        let value = Value::Sequence(vec![Value::Sequence(vec![
            Value::Integer(1),
            Value::Integer(2),
        ])]);
        assert_eq!(encode_str(&value), "- - 1\n  - 2\n");
    }

    #[test]
    fn test_record_in_sequence_shares_dash_line() {
        let value = Value::Sequence(vec![Value::Record(vec![
            RecordField::new("a", Value::Integer(1)),
            RecordField::new("b", Value::Integer(2)),
        ])]);
        assert_eq!(encode_str(&value), "- a: 1\n  b: 2\n");
    }

    #[test]
    fn test_reset_discards_pending_output() {
        let mut enc = Encoder::new();
        assert_eq!(enc.encode_to_string(&Value::Integer(1)), "1\n");
        enc.reset();
        assert_eq!(enc.encode_to_string(&Value::Integer(2)), "2\n");
    }

    #[test]
    fn test_omit_empty_skips_field() {
        let value = Value::Record(vec![
            RecordField::new("name", Value::Text("x".into())),
            RecordField::omit_empty("tags", Value::Sequence(vec![])),
        ]);
        assert_eq!(encode_str(&value), "name: x\n");
    }

    #[test]
    fn test_omit_empty_keeps_populated_field() {
        let value = Value::Record(vec![
            RecordField::new("name", Value::Text("x".into())),
            RecordField::omit_empty("tags", Value::Sequence(vec![Value::Text("a".into())])),
        ]);
        assert_eq!(encode_str(&value), "name: x\ntags: \n  - a\n");
    }
}
