//! Decode engine: text to value, driven by a shape descriptor.
//!
//! A single recursive walker owns one indentation level per call. The
//! `LineState` passed down records whether the callee must still locate
//! the current line and validate its indentation, or whether the caller
//! already positioned the cursor. Nesting always deepens by exactly two
//! spaces; the input is assumed to come from a cooperative writer.

use indexmap::IndexMap;

use crate::cursor::{has_indent, Cursor};
use crate::error::{Error, Result};
use crate::shape::{Field, ScalarKind, Shape};
use crate::value::{RecordField, Value};

/// Whether the current line's indentation still needs validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// The callee must find the next non-blank line and check its indent.
    Fresh,
    /// A `-` entry whose line the caller already validated.
    ListElement,
    /// The value follows `key:`; a scalar may continue on the same line,
    /// a composite must start on a new, deeper line.
    AfterColon,
}

/// Block-scalar joining mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockMode {
    /// No marker: folded joining without the guaranteed trailing newline.
    Default,
    /// `>`: line breaks become spaces, one trailing newline if non-empty.
    Folded,
    /// `|`: line breaks preserved verbatim.
    Literal,
}

/// Recursive-descent decoder over an in-memory buffer.
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Decoder<'a> {
    /// Decoder positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Decoder<'a> {
        Decoder {
            cursor: Cursor::new(data),
        }
    }

    /// Point the decoder at a new buffer, rewinding to the start.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.cursor = Cursor::new(data);
    }

    /// Decode one document into a value of the given shape.
    pub fn decode(&mut self, shape: &Shape) -> Result<Value> {
        self.value("", shape, 0, LineState::Fresh)
    }

    fn value(
        &mut self,
        name: &str,
        shape: &Shape,
        indent: usize,
        state: LineState,
    ) -> Result<Value> {
        match shape {
            Shape::Scalar(kind) => self.scalar(name, *kind, indent),
            Shape::Sequence(elem) => self.sequence(name, elem, indent, state),
            Shape::Mapping(elem) => self.mapping(name, elem, indent, state),
            Shape::Record(fields) => self.record(name, fields, indent, state),
        }
    }

    // ------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------

    fn scalar(&mut self, name: &str, kind: ScalarKind, indent: usize) -> Result<Value> {
        if let ScalarKind::Int { bits } = kind {
            if bits != 32 && bits != 64 {
                return Err(Error::UnsupportedShape {
                    field: name.to_string(),
                    detail: format!("{}-bit integer", bits),
                });
            }
        }

        let text = self.text(indent);
        let offset = self.cursor.offset();

        match kind {
            ScalarKind::Int { bits } => {
                let n: i64 = text.trim().parse().map_err(|e: std::num::ParseIntError| {
                    Error::MalformedScalar {
                        field: name.to_string(),
                        detail: e.to_string(),
                        offset,
                    }
                })?;
                if bits == 32 && i32::try_from(n).is_err() {
                    return Err(Error::MalformedScalar {
                        field: name.to_string(),
                        detail: format!("{} out of range for 32-bit integer", n),
                        offset,
                    });
                }
                Ok(Value::Integer(n))
            }
            ScalarKind::Float => {
                let f: f64 = text.trim().parse().map_err(|e: std::num::ParseFloatError| {
                    Error::MalformedScalar {
                        field: name.to_string(),
                        detail: e.to_string(),
                        offset,
                    }
                })?;
                Ok(Value::Float(f))
            }
            ScalarKind::Bool => match text.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(Error::MalformedScalar {
                    field: name.to_string(),
                    detail: format!("invalid boolean {:?}", other),
                    offset,
                }),
            },
            ScalarKind::Text => Ok(Value::Text(text)),
        }
    }

    /// Read a text scalar: the trimmed remainder of the current line, or
    /// a block scalar when the remainder is empty or a lone marker.
    fn text(&mut self, indent: usize) -> String {
        let (line, pos) = self.cursor.peek_line();
        let line = trim_bytes(line);
        self.cursor.set_offset(pos);

        match line {
            b"" => self.block_text(indent, BlockMode::Default),
            b">" => self.block_text(indent, BlockMode::Folded),
            b"|" => self.block_text(indent, BlockMode::Literal),
            _ => String::from_utf8_lossy(line).into_owned(),
        }
    }

    /// Assemble a block-scalar body. Lines are read raw, so `#` is
    /// ordinary text here.
    fn block_text(&mut self, indent: usize, mode: BlockMode) -> String {
        let mut buf = String::new();
        let mut need_space = false;
        let mut blanks = 0;

        while let Some(line) = self.body_line(indent) {
            if line.is_empty() {
                blanks += 1;
                continue;
            }
            // A blank run becomes that many literal newlines.
            for _ in 0..blanks {
                buf.push('\n');
                need_space = false;
            }
            blanks = 0;

            let line = match mode {
                BlockMode::Literal => line,
                _ => trim_bytes(line),
            };
            if need_space {
                buf.push(' ');
            }
            buf.push_str(&String::from_utf8_lossy(line));
            if mode == BlockMode::Literal {
                buf.push('\n');
            } else {
                need_space = true;
            }
        }

        if mode == BlockMode::Folded && !buf.is_empty() {
            buf.push('\n');
        }
        buf
    }

    /// One raw body line with the block's indentation stripped, or `None`
    /// when the block ends (end of input or an insufficiently indented
    /// line). A whitespace-only line shorter than the indent counts as
    /// blank.
    fn body_line(&mut self, indent: usize) -> Option<&'a [u8]> {
        let (line, pos) = self.cursor.peek_raw_line();
        if self.cursor.offset() == pos {
            return None;
        }
        let ind = indent.min(line.len());
        if !line[..ind].iter().all(|&b| b == b' ') {
            return None;
        }
        self.cursor.set_offset(pos);
        Some(&line[ind..])
    }

    // ------------------------------------------------------------------
    // Composites
    // ------------------------------------------------------------------

    fn sequence(
        &mut self,
        name: &str,
        elem: &Shape,
        indent: usize,
        state: LineState,
    ) -> Result<Value> {
        if state == LineState::AfterColon {
            self.cursor.next_line();
        }

        let mut items = Vec::new();
        let mut probe = state;
        while self.sequence_elem(name, elem, indent, probe, &mut items)? {
            probe = LineState::Fresh;
        }
        Ok(Value::Sequence(items))
    }

    /// Consume one `-` entry at this indentation, if present.
    fn sequence_elem(
        &mut self,
        name: &str,
        elem: &Shape,
        indent: usize,
        state: LineState,
        items: &mut Vec<Value>,
    ) -> Result<bool> {
        if !self.try_line(indent, state) {
            return Ok(false);
        }
        if self.cursor.rest().first() != Some(&b'-') {
            return Ok(false);
        }
        self.cursor.advance(1);
        if self.cursor.rest().first() == Some(&b' ') {
            self.cursor.advance(1);
        }
        items.push(self.value(name, elem, indent + 2, LineState::ListElement)?);
        Ok(true)
    }

    fn mapping(
        &mut self,
        name: &str,
        elem: &Shape,
        indent: usize,
        state: LineState,
    ) -> Result<Value> {
        if state == LineState::AfterColon {
            self.cursor.next_line();
        }

        let mut map = IndexMap::new();
        let mut probe = state;
        while let Some(key) = self.key(name, indent, probe)? {
            let value = self.value(&key, elem, indent + 2, LineState::AfterColon)?;
            map.insert(key, value);
            probe = LineState::Fresh;
        }
        Ok(Value::Mapping(map))
    }

    fn record(
        &mut self,
        name: &str,
        fields: &[Field],
        indent: usize,
        state: LineState,
    ) -> Result<Value> {
        if state == LineState::AfterColon {
            self.cursor.next_line();
        }

        // Fields absent from the document keep their zero values.
        let mut out: Vec<RecordField> = fields
            .iter()
            .map(|f| RecordField {
                name: f.name.clone(),
                omit_empty: f.omit_empty,
                value: Value::zero(&f.shape),
            })
            .collect();

        let mut probe = state;
        while let Some(key) = self.key(name, indent, probe)? {
            let slot = fields.iter().position(|f| f.name == key).ok_or_else(|| {
                Error::UnknownField {
                    field: name.to_string(),
                    key: key.clone(),
                    offset: self.cursor.offset(),
                }
            })?;
            out[slot].value =
                self.value(&key, &fields[slot].shape, indent + 2, LineState::AfterColon)?;
            probe = LineState::Fresh;
        }
        Ok(Value::Record(out))
    }

    // ------------------------------------------------------------------
    // Keys and line positioning
    // ------------------------------------------------------------------

    /// Read the next key at this indentation, leaving the cursor just
    /// past the colon. `None` means the mapping block has ended.
    fn key(&mut self, name: &str, indent: usize, state: LineState) -> Result<Option<String>> {
        if !self.try_line(indent, state) {
            return Ok(None);
        }

        let rest = self.cursor.rest();
        if rest.first() == Some(&b'"') {
            return self.quoted_key(name).map(Some);
        }

        for (i, &c) in rest.iter().enumerate() {
            if c == b':' {
                let key = trim_bytes(&rest[..i]);
                self.cursor.advance(i + 1);
                return Ok(Some(String::from_utf8_lossy(key).into_owned()));
            }
            if c == b'\n' {
                break;
            }
        }

        Err(Error::ShapeMismatch {
            field: name.to_string(),
            detail: "expected key".to_string(),
            offset: self.cursor.offset(),
        })
    }

    /// Read a double-quoted key. After the closing quote only spaces or
    /// tabs may precede the colon.
    fn quoted_key(&mut self, name: &str) -> Result<String> {
        let rest = self.cursor.rest();
        let mut i = 1;
        while i < rest.len() {
            match rest[i] {
                b'\n' => break,
                b'\\' => i += 2,
                b'"' => {
                    let key = unescape_key(&rest[1..i]).map_err(|detail| {
                        Error::MalformedQuotedKey {
                            field: name.to_string(),
                            detail,
                            offset: self.cursor.offset() + i,
                        }
                    })?;
                    let mut j = i + 1;
                    while j < rest.len() {
                        match rest[j] {
                            b' ' | b'\t' => j += 1,
                            b':' => {
                                self.cursor.advance(j + 1);
                                return Ok(key);
                            }
                            _ => {
                                return Err(Error::MalformedQuotedKey {
                                    field: name.to_string(),
                                    detail: "expected colon after quoted key".to_string(),
                                    offset: self.cursor.offset() + j,
                                })
                            }
                        }
                    }
                    break;
                }
                _ => i += 1,
            }
        }

        Err(Error::MalformedQuotedKey {
            field: name.to_string(),
            detail: "unterminated quoted key".to_string(),
            offset: self.cursor.offset(),
        })
    }

    /// Position the cursor at the next value-bearing line and consume its
    /// indentation. False means the enclosing block has ended (or the
    /// input has).
    fn try_line(&mut self, indent: usize, state: LineState) -> bool {
        if state == LineState::ListElement {
            // The caller already validated this line; reuse it unless the
            // remainder after the dash is blank.
            let (line, pos) = self.cursor.peek_line();
            if !trim_bytes(line).is_empty() {
                return true;
            }
            self.cursor.set_offset(pos);
        }

        let line = loop {
            let (line, pos) = self.cursor.peek_line();
            if self.cursor.offset() == pos {
                return false; // end of input
            }
            if !trim_bytes(line).is_empty() {
                break line;
            }
            self.cursor.set_offset(pos);
        };

        if has_indent(line, indent) {
            self.cursor.advance(indent);
            return true;
        }
        false
    }
}

/// Strip leading and trailing ASCII whitespace from a byte slice.
fn trim_bytes(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

/// Unescape the interior of a quoted key.
fn unescape_key(raw: &[u8]) -> std::result::Result<String, String> {
    let raw = String::from_utf8_lossy(raw);
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err("truncated \\u escape".to_string());
                }
                let cp = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("bad \\u escape \\u{}", hex))?;
                match char::from_u32(cp) {
                    Some(ch) => out.push(ch),
                    None => return Err(format!("\\u escape out of range \\u{}", hex)),
                }
            }
            Some(other) => return Err(format!("bad escape \\{}", other)),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(out)
}
