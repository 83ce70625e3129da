//! The parser is responsible for turning the tokens into declarations.
//!
//! Only the declaration level of a file is parsed in full. Function bodies, `impl`
//! blocks and the like are checked for balanced delimiters and skipped, while the
//! initializers of constants and statics go through a small expression grammar,
//! so that obviously broken code (like a string literal cut in two) is rejected.
//!
//! ## Conventions
//!
//! For functions starting with `parse_` or `skip_`:
//! - Upon entering a parsing function, `current_token` is assumed to be the first
//! token of the grammar.
//! - Upon exiting a parsing function, `current_token` is assumed to be the first
//! token after the grammar.
//!
//! For functions starting with `check_`:
//! - Upon entering a parsing function, `current_token` is assumed to be the first
//! token of the grammar.
//! - Upon exiting the function, `current_token` should be the same as it was on
//! entry.
//!
//! Errors are pushed onto a `&mut Vec<ParseError>` rather than returned, so one
//! pass reports as many problems as it can.

use std::borrow::Cow;
use std::rc::Rc;

use constmsg_errors::{merge_spans, ParseError, ParserFound, SourceSpan};

use crate::ast::SourceAst;
use crate::comments::{CommentMap, LineIndex};
use crate::lexer::tokenizer::TokenStream;
use crate::lexer::tokens::*;

mod expr;
mod item;

pub struct Parser<'src> {
    source: &'src str,
    tokens: Rc<[Token<'src>]>,
    comments: CommentMap<'src>,
    /// The index of the next token to be returned.
    cursor: usize,
    current_token: Option<Token<'src>>,
    /// End of the last token that was consumed.
    last_end: usize,
}

impl<'src> Parser<'src> {
    pub fn new(stream: TokenStream<'src>) -> Parser<'src> {
        let lines = LineIndex::new(stream.source);
        let comments = CommentMap::new(&stream, &lines);
        Parser {
            source: stream.source,
            tokens: stream.tokens,
            comments,
            cursor: 0,
            current_token: None,
            last_end: 0,
        }
    }

    pub fn next(&mut self) {
        if let Some(tok) = self.current_token {
            self.last_end = tok.end();
        }
        self.current_token = self.tokens.get(self.cursor).copied();
        self.cursor += 1;
    }

    /// Index of `current_token` in the token stream.
    fn current_idx(&self) -> usize {
        self.cursor.saturating_sub(1)
    }

    fn current_kind(&self) -> Option<TokenKind<'src>> {
        self.current_token.map(|tok| tok.kind)
    }

    /// The kind of the token `n` tokens after the current one.
    fn peek_kind(&self, n: usize) -> Option<TokenKind<'src>> {
        self.tokens.get(self.cursor + n).map(|tok| tok.kind)
    }

    fn check(&self, kind: TokenKind<'src>) -> bool {
        self.current_kind() == Some(kind)
    }

    fn check_punct(&self, punct: Punct) -> bool {
        self.check(TokenKind::Punct(punct))
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.check(TokenKind::Keyword(kw))
    }

    fn eat(&mut self, kind: TokenKind<'src>) -> bool {
        let matched = self.check(kind);
        if matched {
            self.next();
        }
        matched
    }

    fn eat_punct(&mut self, punct: Punct) -> bool {
        self.eat(TokenKind::Punct(punct))
    }

    /// Consume the current token if it's `kind`, otherwise report that `ex` was expected.
    fn expect(
        &mut self,
        kind: TokenKind<'src>,
        ex: &'static str,
        errors: &mut Vec<ParseError<'src>>,
    ) -> bool {
        if self.eat(kind) {
            true
        } else {
            errors.push(self.expected(ex));
            false
        }
    }

    fn expected(&self, ex: &'static str) -> ParseError<'src> {
        ParseError::ExpectedFound {
            ex,
            found: self.found(),
            loc: self.here(),
        }
    }

    fn found(&self) -> ParserFound<'src> {
        self.current_token.map_or(ParserFound::Eof, |tok| {
            ParserFound::Str(Cow::Borrowed(tok.kind.as_str()))
        })
    }

    /// Span of the current token, or an empty span at the end of the input.
    fn here(&self) -> SourceSpan {
        self.current_token
            .map_or(SourceSpan::from((self.source.len(), 0)), |tok| tok.span)
    }

    /// Comments on the same line after the last consumed token.
    fn trailing_comments(&self) -> &[Comment<'src>] {
        match self.cursor.checked_sub(2) {
            Some(idx) => self.comments.trailing(idx),
            None => &[],
        }
    }

    /// Replace the current token with what's left of it after its first `len`
    /// bytes, which is a `kind` token. This splits `>=` into `>` and `=`.
    fn split_current(&mut self, len: usize, kind: TokenKind<'src>) {
        if let Some(tok) = self.current_token {
            self.current_token = Some(Token {
                kind,
                span: SourceSpan::from((tok.span.offset() + len, tok.span.len() - len)),
            });
        }
    }

    /// Span from the start of `start` to the end of the last consumed token.
    fn span_from(&self, start: SourceSpan) -> SourceSpan {
        let end = self.last_end.max(start.offset());
        merge_spans(start, SourceSpan::from((end, 0)))
    }

    /// Main entry point for parsing.
    pub fn parse(&mut self) -> (SourceAst<'src>, Vec<ParseError<'src>>) {
        let mut declarations = vec![];
        let mut errors = vec![];

        // inner attributes, `#![...]`
        while self.check_punct(Punct::Pound)
            && self.peek_kind(0) == Some(TokenKind::Punct(Punct::Bang))
        {
            self.parse_attribute(&mut errors);
        }

        while self.current_token.is_some() {
            self.parse_item(&mut declarations, &mut errors);
        }

        (SourceAst::new(declarations), errors)
    }
}

#[cfg(test)]
impl<'src> Parser<'src> {
    pub(crate) fn is_done(&self) -> bool {
        self.current_token.is_none()
    }
}
