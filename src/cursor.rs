//! Low-level line cursor over the input buffer.
//!
//! The decode engine is built on this primitive: it tracks a byte offset
//! into an immutable buffer and exposes the current line with or without
//! comment stripping. The raw variant exists because `#` is not a comment
//! marker inside a block-scalar body.

/// Byte cursor with line-oriented peeking.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    off: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Cursor<'a> {
        Cursor { data, off: 0 }
    }

    /// Current byte offset, for error reporting.
    pub fn offset(&self) -> usize {
        self.off
    }

    /// Move the cursor to an absolute offset.
    pub fn set_offset(&mut self, off: usize) {
        self.off = off;
    }

    /// Move the cursor forward `n` bytes.
    pub fn advance(&mut self, n: usize) {
        self.off += n;
    }

    /// Unconsumed input from the current offset.
    ///
    /// Key scanning reads the raw buffer through this, so a `#` inside a
    /// quoted key is not mistaken for a comment.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.off..]
    }

    /// The current line truncated at the first `#`, and the offset just
    /// past the line terminator (or end of input).
    pub fn peek_line(&self) -> (&'a [u8], usize) {
        let mut comment = None;
        for i in self.off..self.data.len() {
            match self.data[i] {
                b'#' if comment.is_none() => comment = Some(i),
                b'\n' => return (&self.data[self.off..comment.unwrap_or(i)], i + 1),
                _ => {}
            }
        }
        let end = comment.unwrap_or(self.data.len());
        (&self.data[self.off..end], self.data.len())
    }

    /// The current line without comment stripping, and the offset just
    /// past the terminator. Used only for block-scalar bodies.
    pub fn peek_raw_line(&self) -> (&'a [u8], usize) {
        for i in self.off..self.data.len() {
            if self.data[i] == b'\n' {
                return (&self.data[self.off..i], i + 1);
            }
        }
        (&self.data[self.off..], self.data.len())
    }

    /// Skip just past the next terminator without inspecting content.
    pub fn next_line(&mut self) {
        while self.off < self.data.len() {
            let c = self.data[self.off];
            self.off += 1;
            if c == b'\n' {
                break;
            }
        }
    }
}

/// True iff `line` is longer than `n` bytes and its first `n` bytes are
/// spaces. Tabs never count as indentation, so a tab-indented line ends
/// the enclosing block.
pub fn has_indent(line: &[u8], n: usize) -> bool {
    line.len() > n && line[..n].iter().all(|&b| b == b' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_line_strips_comment() {
        let c = Cursor::new(b"abc # note\ndef\n");
        let (line, pos) = c.peek_line();
        assert_eq!(line, b"abc ");
        assert_eq!(pos, 11);
    }

    #[test]
    fn test_peek_line_first_hash_wins() {
        let c = Cursor::new(b"a # b # c\n");
        let (line, _) = c.peek_line();
        assert_eq!(line, b"a ");
    }

    #[test]
    fn test_peek_line_without_terminator() {
        let c = Cursor::new(b"abc");
        let (line, pos) = c.peek_line();
        assert_eq!(line, b"abc");
        assert_eq!(pos, 3);
    }

    #[test]
    fn test_peek_raw_line_keeps_comment() {
        let c = Cursor::new(b"abc # note\n");
        let (line, _) = c.peek_raw_line();
        assert_eq!(line, b"abc # note");
    }

    #[test]
    fn test_next_line() {
        let mut c = Cursor::new(b"abc\ndef");
        c.next_line();
        assert_eq!(c.offset(), 4);
        c.next_line();
        assert_eq!(c.offset(), 7);
        c.next_line();
        assert_eq!(c.offset(), 7);
    }

    #[test]
    fn test_has_indent() {
        assert!(has_indent(b"  a", 2));
        assert!(!has_indent(b"  ", 2));
        assert!(!has_indent(b" a", 2));
        assert!(!has_indent(b"\t\ta", 2));
        assert!(has_indent(b"a", 0));
        assert!(!has_indent(b"", 0));
    }
}
