use std::rc::Rc;

use super::{
    tokens::{Comment, CommentStyle, Delimiter, Keyword, LiteralToken, Punct, Token, TokenKind},
    SourceReader,
};

use constmsg_errors::{ParseError, ParserFound, SourceSpan};
use unicode_ident::{is_xid_continue, is_xid_start};

pub fn is_ident_start(c: char) -> bool {
    is_xid_start(c) || c == '_'
}

/// Which escapes a quoted literal accepts, decided by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoted {
    /// `"..."` and `'.'`: `\x` only up to `7F`.
    Str,
    /// `b"..."` and `b'.'`: any `\x`, no `\u`.
    Bytes,
    /// `c"..."`: any `\x`, and `\u`.
    CStr,
}
impl Quoted {
    fn from_prefix(literal: &str) -> Self {
        match literal.as_bytes().first() {
            Some(b'b') => Quoted::Bytes,
            Some(b'c') => Quoted::CStr,
            _ => Quoted::Str,
        }
    }
}

/// Punctuation, longest first so that a prefix never shadows a longer match.
const PUNCTS: &[(&str, Punct)] = &[
    ("...", Punct::DotDotDot),
    ("..=", Punct::DotDotEq),
    ("<<=", Punct::ShlEq),
    (">>=", Punct::ShrEq),
    ("::", Punct::PathSep),
    ("->", Punct::RArrow),
    ("=>", Punct::FatArrow),
    ("==", Punct::EqEq),
    ("!=", Punct::Ne),
    ("<=", Punct::Le),
    (">=", Punct::Ge),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("+=", Punct::PlusEq),
    ("-=", Punct::MinusEq),
    ("*=", Punct::StarEq),
    ("/=", Punct::SlashEq),
    ("%=", Punct::PercentEq),
    ("^=", Punct::CaretEq),
    ("&=", Punct::AndEq),
    ("|=", Punct::OrEq),
    ("<<", Punct::Shl),
    (">>", Punct::Shr),
    ("..", Punct::DotDot),
    (";", Punct::Semi),
    (",", Punct::Comma),
    (".", Punct::Dot),
    (":", Punct::Colon),
    ("#", Punct::Pound),
    ("$", Punct::Dollar),
    ("?", Punct::Question),
    ("~", Punct::Tilde),
    ("@", Punct::At),
    ("!", Punct::Bang),
    ("=", Punct::Eq),
    ("<", Punct::Lt),
    (">", Punct::Gt),
    ("&", Punct::And),
    ("|", Punct::Or),
    ("^", Punct::Caret),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
];

/// The tokens of a source file, with its comments kept aside in source order.
pub struct TokenStream<'src> {
    pub tokens: Rc<[Token<'src>]>,
    pub comments: Rc<[Comment<'src>]>,
    pub source: &'src str,
}
impl<'src> TokenStream<'src> {
    pub fn src_len(&self) -> usize {
        self.source.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<'src> SourceReader<'src> {
    pub fn tokenize(&mut self) -> (TokenStream<'src>, Vec<ParseError<'src>>) {
        let mut tokens = Vec::new();
        let mut comments = Vec::new();
        let mut errors = Vec::new();

        while let Some(c) = self.peek() {
            let start = self.index;
            match c {
                c if c.is_whitespace() => {
                    self.next_char();
                }

                '/' if self.starts_with("//") => comments.push(self.eat_line_comment()),
                '/' if self.starts_with("/*") => match self.eat_block_comment() {
                    Ok(comment) => comments.push(comment),
                    Err(err) => errors.push(err),
                },

                // Raw identifier, `r#type`.
                'r' if self.peek_nth(1) == Some('#')
                    && self.peek_nth(2).is_some_and(is_ident_start) =>
                {
                    self.skip(2);
                    self.eat_ident_rest();
                    tokens.push(Token {
                        kind: TokenKind::Ident(self.slice_from(start)),
                        span: self.source_span_from(start),
                    });
                }

                // Raw strings: `r"..."`, `r#"..."#`, `br"..."`, `cr#"..."#`.
                'r' if matches!(self.peek_nth(1), Some('"' | '#')) => {
                    self.next_char();
                    tokens.extend(self.eat_raw_string(start, &mut errors));
                }
                'b' | 'c'
                    if self.peek_nth(1) == Some('r')
                        && matches!(self.peek_nth(2), Some('"' | '#')) =>
                {
                    self.skip(2);
                    tokens.extend(self.eat_raw_string(start, &mut errors));
                }

                // Byte and C strings, byte chars.
                'b' | 'c' if self.peek_nth(1) == Some('"') => {
                    self.next_char();
                    tokens.push(self.eat_string(start, &mut errors));
                }
                'b' if self.peek_nth(1) == Some('\'') => {
                    self.next_char();
                    tokens.push(self.eat_char(start, &mut errors));
                }

                // An identifier is an xid_start or underscore followed by zero or more xid_continue.
                c if is_ident_start(c) => {
                    self.next_char();
                    self.eat_ident_rest();
                    let ident = self.slice_from(start);
                    let kind = match Keyword::from_str(ident) {
                        Some(kw) => TokenKind::Keyword(kw),
                        None => TokenKind::Ident(ident),
                    };
                    tokens.push(Token {
                        kind,
                        span: self.source_span_from(start),
                    });
                }

                '"' => tokens.push(self.eat_string(start, &mut errors)),

                // `'a'` and `'\n'` are chars, `'a` and `'static` are lifetimes.
                '\'' => {
                    let is_char = match (self.peek_nth(1), self.peek_nth(2)) {
                        (Some('\\'), _) => true,
                        (Some(_), Some('\'')) => true,
                        (Some(c), _) => !is_ident_start(c),
                        (None, _) => true,
                    };
                    if is_char {
                        tokens.push(self.eat_char(start, &mut errors));
                    } else {
                        self.next_char();
                        self.eat_ident_rest();
                        tokens.push(Token {
                            kind: TokenKind::Lifetime(self.slice_from(start)),
                            span: self.source_span_from(start),
                        });
                    }
                }

                '0'..='9' => tokens.push(self.eat_number(&mut errors)),

                // Delimiters.
                '(' | '{' | '[' | ')' | '}' | ']' => {
                    self.next_char();
                    let kind = match c {
                        '(' => TokenKind::OpenDelimiter(Delimiter::Paren),
                        '{' => TokenKind::OpenDelimiter(Delimiter::Brace),
                        '[' => TokenKind::OpenDelimiter(Delimiter::Bracket),
                        ')' => TokenKind::CloseDelimiter(Delimiter::Paren),
                        '}' => TokenKind::CloseDelimiter(Delimiter::Brace),
                        _ => TokenKind::CloseDelimiter(Delimiter::Bracket),
                    };
                    tokens.push(Token {
                        kind,
                        span: self.source_span_backward(1),
                    });
                }

                _ => {
                    if let Some(&(text, punct)) = PUNCTS.iter().find(|(p, _)| self.starts_with(p)) {
                        self.skip(text.len());
                        tokens.push(Token {
                            kind: TokenKind::Punct(punct),
                            span: self.source_span_from(start),
                        });
                    } else {
                        self.next_char();
                        errors.push(ParseError::UnexpectedChar {
                            ch: c,
                            loc: self.source_span_from(start),
                        });
                    }
                }
            }
        }

        (
            TokenStream {
                tokens: tokens.into(),
                comments: comments.into(),
                source: self.source,
            },
            errors,
        )
    }

    /// Consume identifier characters after the first one.
    fn eat_ident_rest(&mut self) {
        while let Some(c) = self.peek() {
            if !is_xid_continue(c) {
                break;
            }
            self.next_char();
        }
    }

    /// Going into this function, the reader should be at the first `/`.
    fn eat_line_comment(&mut self) -> Comment<'src> {
        let start = self.index;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.next_char();
        }
        let text = self.slice_from(start);
        let style = if text.starts_with("///") && !text.starts_with("////") {
            CommentStyle::OuterDocLine
        } else if text.starts_with("//!") {
            CommentStyle::InnerDocLine
        } else {
            CommentStyle::Line
        };
        Comment {
            text,
            style,
            span: self.source_span_from(start),
        }
    }

    /// Block comments nest, like in rustc.
    fn eat_block_comment(&mut self) -> Result<Comment<'src>, ParseError<'src>> {
        let start = self.index;
        self.skip(2);

        let mut depth = 1;
        while depth > 0 {
            if self.starts_with("/*") {
                self.skip(2);
                depth += 1;
            } else if self.starts_with("*/") {
                self.skip(2);
                depth -= 1;
            } else if self.next_char().is_none() {
                return Err(ParseError::UnterminatedComment {
                    loc: SourceSpan::from((start, 2)),
                });
            }
        }

        let text = self.slice_from(start);
        let style = if text.starts_with("/**") && !text.starts_with("/***") && text != "/**/" {
            CommentStyle::OuterDocBlock
        } else if text.starts_with("/*!") {
            CommentStyle::InnerDocBlock
        } else {
            CommentStyle::Block
        };
        Ok(Comment {
            text,
            style,
            span: self.source_span_from(start),
        })
    }

    /// Going into this function, the reader should be at the opening quote, and any prefix
    /// should start at `start`.
    fn eat_string(&mut self, start: usize, errors: &mut Vec<ParseError<'src>>) -> Token<'src> {
        let quoted = Quoted::from_prefix(self.slice_from(start));
        self.next_char();
        loop {
            match self.next_char() {
                None => {
                    errors.push(ParseError::UnterminatedString {
                        loc: SourceSpan::from((start, 1)),
                    });
                    break;
                }
                Some('\\') => self.eat_escape(quoted, false, errors),
                Some('"') => break,
                Some(_) => {}
            }
        }
        Token {
            kind: TokenKind::Literal(LiteralToken::Str(self.slice_from(start))),
            span: self.source_span_from(start),
        }
    }

    /// Going into this function, the reader should be just past the prefix (`r`, `br`, `cr`),
    /// at the first `#` or the opening quote.
    fn eat_raw_string(
        &mut self,
        start: usize,
        errors: &mut Vec<ParseError<'src>>,
    ) -> Option<Token<'src>> {
        let mut hashes = 0;
        while self.peek() == Some('#') {
            self.next_char();
            hashes += 1;
        }

        if self.peek() != Some('"') {
            errors.push(ParseError::ExpectedFound {
                ex: "'\"'",
                found: self
                    .peek()
                    .map_or(ParserFound::Eof, |c| ParserFound::Str(c.to_string().into())),
                loc: SourceSpan::from((self.index, 1)),
            });
            return None;
        }
        self.next_char();

        loop {
            match self.next_char() {
                None => {
                    errors.push(ParseError::UnterminatedString {
                        loc: SourceSpan::from((start, 1)),
                    });
                    break;
                }
                Some('"') if (0..hashes).all(|n| self.peek_nth(n) == Some('#')) => {
                    self.skip(hashes);
                    break;
                }
                Some(_) => {}
            }
        }
        Some(Token {
            kind: TokenKind::Literal(LiteralToken::Str(self.slice_from(start))),
            span: self.source_span_from(start),
        })
    }

    /// Going into this function, the reader should be at the opening quote. A char
    /// literal can't span lines, so an unterminated one stops at the end of the line.
    fn eat_char(&mut self, start: usize, errors: &mut Vec<ParseError<'src>>) -> Token<'src> {
        let quoted = Quoted::from_prefix(self.slice_from(start));
        self.next_char();
        if self.peek() == Some('\\') {
            self.next_char();
            self.eat_escape(quoted, true, errors);
        } else {
            self.next_char();
        }
        loop {
            match self.peek() {
                Some('\'') => {
                    self.next_char();
                    break;
                }
                Some('\n') | None => {
                    errors.push(ParseError::UnterminatedChar {
                        loc: SourceSpan::from((start, 1)),
                    });
                    break;
                }
                Some(_) => {
                    self.next_char();
                }
            }
        }
        Token {
            kind: TokenKind::Literal(LiteralToken::Char(self.slice_from(start))),
            span: self.source_span_from(start),
        }
    }

    /// Going into this function, the backslash has just been consumed. Unknown
    /// escapes are reported, and lexing carries on after the escaped character.
    fn eat_escape(&mut self, quoted: Quoted, in_char: bool, errors: &mut Vec<ParseError<'src>>) {
        let start = self.index - 1;
        let valid = match self.next_char() {
            // the literal is unterminated, which is reported on its own
            None => return,
            Some('n' | 'r' | 't' | '\\' | '0' | '\'' | '"') => true,
            // line continuation
            Some('\n') => !in_char,
            Some('\r') => !in_char && self.peek() == Some('\n'),
            Some('x') => match (self.peek(), self.peek_nth(1)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    self.skip(2);
                    quoted != Quoted::Str || hi <= '7'
                }
                _ => false,
            },
            Some('u') if quoted != Quoted::Bytes => self.eat_unicode_escape(),
            Some(_) => false,
        };
        if !valid {
            errors.push(ParseError::InvalidEscape {
                escape: self.slice_from(start).into(),
                loc: self.source_span_from(start),
            });
        }
    }

    /// `{` 1 to 6 hex digits `}`, naming a char. The `u` has just been consumed.
    fn eat_unicode_escape(&mut self) -> bool {
        if self.peek() != Some('{') {
            return false;
        }
        self.next_char();
        let mut value = 0u32;
        let mut digits = 0;
        loop {
            match self.peek() {
                Some('}') => {
                    self.next_char();
                    break;
                }
                Some('_') if digits > 0 => {
                    self.next_char();
                }
                Some(c) => match c.to_digit(16) {
                    Some(digit) => {
                        self.next_char();
                        digits += 1;
                        if digits <= 6 {
                            value = value * 16 + digit;
                        }
                    }
                    None => return false,
                },
                None => return false,
            }
        }
        (1..=6).contains(&digits) && char::from_u32(value).is_some()
    }

    fn eat_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c == '_' {
                self.next_char();
            } else if c.is_digit(radix) {
                self.next_char();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Integer and float literals, with their suffixes.
    fn eat_number(&mut self, errors: &mut Vec<ParseError<'src>>) -> Token<'src> {
        let start = self.index;
        let mut is_float = false;

        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x')) => 16,
            (Some('0'), Some('o')) => 8,
            (Some('0'), Some('b')) => 2,
            _ => 10,
        };

        if radix != 10 {
            self.skip(2);
            if self.eat_digits(radix) == 0 {
                errors.push(ParseError::InvalidNumber {
                    lit: self.slice_from(start).into(),
                    loc: self.source_span_from(start),
                    reason: "no digits after the base prefix",
                });
            }
        } else {
            self.eat_digits(10);

            // `1.5` and `1.` are floats, but `1..2` is a range and `1.foo()` is a method call.
            if self.peek() == Some('.')
                && !matches!(self.peek_nth(1), Some(c) if c == '.' || is_ident_start(c))
            {
                self.next_char();
                self.eat_digits(10);
                is_float = true;
            }

            if matches!(self.peek(), Some('e' | 'E')) {
                let sign = usize::from(matches!(self.peek_nth(1), Some('+' | '-')));
                if self.peek_nth(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                    self.skip(1 + sign);
                    self.eat_digits(10);
                    is_float = true;
                }
            }
        }

        // Suffix, like `u8` or `f64`.
        if self.peek().is_some_and(is_ident_start) {
            let suffix_start = self.index;
            self.next_char();
            self.eat_ident_rest();
            if radix == 10 && self.slice_from(suffix_start).starts_with('f') {
                is_float = true;
            }
        }

        let text = self.slice_from(start);
        Token {
            kind: TokenKind::Literal(if is_float {
                LiteralToken::Float(text)
            } else {
                LiteralToken::Int(text)
            }),
            span: self.source_span_from(start),
        }
    }
}
