// src/core/reader.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("expected another argument, but the message ended")]
    Exhausted,
}

/// An opaque cursor snapshot handed out by [`TokenReader::mark`].
///
/// It can only be obtained from the reader itself, so a rewind can never
/// jump to a position the reader has not actually visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Owns the whitespace-split tokens of one incoming message and a cursor
/// over them.
///
/// Token 0 is the command-name token; it is considered consumed before
/// parsing begins, so a fresh reader starts with its cursor on it. The
/// cursor only moves forward via [`next`](Self::next) and only moves
/// backward via an explicit [`rewind`](Self::rewind) to a previously
/// captured [`Mark`].
#[derive(Debug)]
pub struct TokenReader {
    tokens: Vec<String>,
    cursor: usize,
}

impl TokenReader {
    /// Creates a reader over the given tokens with the cursor on token 0.
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Splits a raw message on whitespace and wraps the result.
    pub fn from_message(content: &str) -> Self {
        Self::new(content.split_whitespace().map(str::to_string).collect())
    }

    /// True iff a token exists beyond the current cursor.
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.tokens.len()
    }

    /// Advances the cursor by one and returns the token at the new position.
    ///
    /// Fails with [`ReaderError::Exhausted`] if no token remains; the cursor
    /// is left untouched in that case.
    pub fn next(&mut self) -> Result<&str, ReaderError> {
        if !self.has_next() {
            return Err(ReaderError::Exhausted);
        }
        self.cursor += 1;
        self.tokens
            .get(self.cursor)
            .map(String::as_str)
            .ok_or(ReaderError::Exhausted)
    }

    /// The token currently under the cursor, for diagnostics.
    pub fn current(&self) -> Option<&str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    /// The current cursor index. Because token 0 is the command name, this
    /// doubles as the 1-based index of the last consumed argument token.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Captures the current cursor so a failed match attempt can be undone.
    pub fn mark(&self) -> Mark {
        Mark(self.cursor)
    }

    /// Restores the cursor to a previously captured position.
    ///
    /// Rewinding forward is a logic error; marks always originate from this
    /// reader, so the assert only fires on misuse within the crate.
    pub fn rewind(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.cursor, "rewind may only move backwards");
        self.cursor = mark.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(tokens: &[&str]) -> TokenReader {
        TokenReader::new(tokens.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_next_walks_past_command_token() {
        let mut r = reader(&["!count", "42"]);
        assert_eq!(r.current(), Some("!count"));
        assert!(r.has_next());
        assert_eq!(r.next().unwrap(), "42");
        assert_eq!(r.position(), 1);
        assert!(!r.has_next());
    }

    #[test]
    fn test_next_fails_when_exhausted() {
        let mut r = reader(&["!ping"]);
        assert!(!r.has_next());
        assert_eq!(r.next(), Err(ReaderError::Exhausted));
        // A failed `next` must not move the cursor.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_mark_and_rewind_restore_cursor() {
        let mut r = reader(&["!cmd", "a", "b", "c"]);
        let mark = r.mark();
        r.next().unwrap();
        r.next().unwrap();
        assert_eq!(r.position(), 2);

        r.rewind(mark);
        assert_eq!(r.position(), 0);
        // The same tokens are visible again after the rewind.
        assert_eq!(r.next().unwrap(), "a");
    }

    #[test]
    fn test_from_message_splits_on_whitespace() {
        let mut r = TokenReader::from_message("  !echo   hello\tworld ");
        assert_eq!(r.current(), Some("!echo"));
        assert_eq!(r.next().unwrap(), "hello");
        assert_eq!(r.next().unwrap(), "world");
        assert!(!r.has_next());
    }

    #[test]
    fn test_empty_message() {
        let r = TokenReader::from_message("   ");
        assert_eq!(r.current(), None);
        assert!(!r.has_next());
    }
}
