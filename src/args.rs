//! Argument cursor abstraction for free-text invocations.
//!
//! Resolution needs save/restore (backtracking) semantics: the first token
//! of a message body is read speculatively, and handed back when it does
//! not select a subcommand so a default handler can reinterpret the same
//! token as its first argument.

/// Cursor over the whitespace-delimited tokens of a message body.
///
/// The host injects its own implementation; [`TokenCursor`] is the bundled
/// in-memory one. `next_maybe` folds the wire-level `{ exists, value }`
/// shape into an `Option`.
pub trait ArgumentCursor: Send {
    /// Push the current position onto the mark stack.
    fn save(&mut self);

    /// Pop the most recent mark and rewind to it. No-op when no mark is set.
    fn restore(&mut self);

    /// Consume and return the next token, or `None` at end of input.
    fn next_maybe(&mut self) -> Option<String>;
}

/// In-memory [`ArgumentCursor`] over a pre-tokenized message body.
#[derive(Debug, Clone, Default)]
pub struct TokenCursor {
    tokens: Vec<String>,
    pos: usize,
    marks: Vec<usize>,
}

impl TokenCursor {
    /// Tokenize `content` on whitespace and start at the first token.
    pub fn new(content: &str) -> Self {
        Self {
            tokens: content.split_whitespace().map(str::to_owned).collect(),
            pos: 0,
            marks: Vec::new(),
        }
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &[String] {
        &self.tokens[self.pos..]
    }
}

impl ArgumentCursor for TokenCursor {
    fn save(&mut self) {
        self.marks.push(self.pos);
    }

    fn restore(&mut self) {
        if let Some(pos) = self.marks.pop() {
            self.pos = pos;
        }
    }

    fn next_maybe(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}
