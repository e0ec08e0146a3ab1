//! Cursor over normalized XML text.

/// A forward-only cursor over a string slice, positioned on a char boundary.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset of the cursor.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to a position previously returned by [`Self::pos`].
    pub(crate) fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    pub(crate) fn is_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `s` if the input continues with it.
    pub(crate) fn consume_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consumes the longest prefix whose chars all satisfy `pred`.
    pub(crate) fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }

    /// Consumes everything before the next occurrence of `delimiter`,
    /// leaving the delimiter itself unconsumed. Returns `None` without
    /// moving when the delimiter never occurs.
    pub(crate) fn consume_until(&mut self, delimiter: &str) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.find(delimiter)?;
        self.pos += len;
        Some(&rest[..len])
    }

    /// Consumes everything before the first position where `stop` matches.
    pub(crate) fn consume_until_fn(&mut self, stop: impl Fn(&str) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| stop(&rest[i..]))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }
}
