//! Character-level reading of the source text. The tokenizer builds on the
//! cursor here and never indexes into the source on its own.

use constmsg_errors::SourceSpan;

pub mod tokenizer;
pub mod tokens;

/// A cursor over the source text. Everything before `index` has been read.
pub struct SourceReader<'src> {
    pub source: &'src str,
    /// Byte offset of the next unread character, always on a char boundary.
    pub index: usize,
}

impl<'src> SourceReader<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, index: 0 }
    }

    /// The unread part of the source.
    pub fn rest(&self) -> &'src str {
        &self.source[self.index..]
    }

    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.index += ch.len_utf8();
        Some(ch)
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// `peek_nth(0)` is the same as `peek()`.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume `n` characters, or whatever is left if there are fewer.
    ///
    /// ```
    /// # use constmsg_parser::lexer::SourceReader;
    /// let mut reader = SourceReader::new("é!");
    /// reader.skip(1);
    /// assert_eq!(reader.index, 2);
    /// reader.skip(5);
    /// assert_eq!(reader.rest(), "");
    /// ```
    pub fn skip(&mut self, n: usize) {
        let rest = self.rest();
        self.index += rest.char_indices().nth(n).map_or(rest.len(), |(at, _)| at);
    }

    /// Everything read since byte offset `start`.
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.index]
    }

    pub fn source_span_from(&self, start: usize) -> SourceSpan {
        SourceSpan::from((start, self.index - start))
    }

    /// Span of the last `len` bytes read.
    pub fn source_span_backward(&self, len: usize) -> SourceSpan {
        self.source_span_from(self.index - len)
    }
}
