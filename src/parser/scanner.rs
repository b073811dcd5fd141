//! Single-pass character cursor over D2 source text.
//!
//! All parsing routines are built on the peek/advance/skip-whitespace
//! primitives here. The cursor tracks byte offsets (D2 spans are half-open
//! byte ranges) but always advances by whole characters, so every offset it
//! reports is a valid `char` boundary.

/// Character cursor over a source string.
#[derive(Debug)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Next character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// True if the remaining input starts with `s`.
    pub fn starts_with(&self, s: &str) -> bool {
        self.text[self.pos..].starts_with(s)
    }

    /// Advance past one character. No-op at end of input.
    pub fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    /// Advance past a known ASCII delimiter or operator of `n` bytes.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Slice of the source between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Consume characters until `pred` returns true or input ends.
    /// Returns the span consumed.
    pub fn consume_until(&mut self, mut pred: impl FnMut(char) -> bool) -> (usize, usize) {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if pred(ch) {
                break;
            }
            self.bump();
        }
        (start, self.pos)
    }

    /// Consume up to and including the next occurrence of `delim`;
    /// consumes the remainder of the input when the delimiter is absent.
    pub fn consume_through(&mut self, delim: &str) -> (usize, usize) {
        let start = self.pos;
        match self.text[self.pos..].find(delim) {
            Some(rel) => {
                let content_end = self.pos + rel;
                self.pos = content_end + delim.len();
                (start, content_end)
            }
            None => {
                self.pos = self.text.len();
                (start, self.pos)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_whitespace_and_tracks_offsets() {
        let mut s = Scanner::new("  \n\tserver");
        s.skip_whitespace();
        assert_eq!(s.pos(), 4);
        assert_eq!(s.peek(), Some('s'));
    }

    #[test]
    fn bump_advances_by_whole_chars() {
        let mut s = Scanner::new("héllo");
        s.bump();
        s.bump();
        // 'h' is 1 byte, 'é' is 2 bytes
        assert_eq!(s.pos(), 3);
        assert_eq!(s.peek(), Some('l'));
    }

    #[test]
    fn consume_through_handles_missing_delimiter() {
        let mut s = Scanner::new("no closing quote");
        let (start, end) = s.consume_through("\"");
        assert_eq!((start, end), (0, 16));
        assert!(s.at_end());
    }

    #[test]
    fn starts_with_matches_operators() {
        let s = Scanner::new("<-> b");
        assert!(s.starts_with("<->"));
        assert!(s.starts_with("<-"));
        assert!(!s.starts_with("->"));
    }
}
