use constmsg_errors::SourceSpan;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keyword {
    As,
    Async,
    Const,
    Crate,
    Dyn,
    Else,
    Enum,
    Extern,
    False,
    Fn,
    For,
    If,
    Impl,
    In,
    Let,
    Loop,
    Match,
    Mod,
    Move,
    Mut,
    Pub,
    Ref,
    Return,
    SelfValue,
    SelfType,
    Static,
    Struct,
    Super,
    Trait,
    True,
    Type,
    Unsafe,
    Use,
    Where,
    While,
}

impl Keyword {
    /// Returns `None` if the identifier is not a keyword. Otherwise, returns
    /// the keyword.
    ///
    /// Weak keywords like `union` and `macro_rules` are left as identifiers,
    /// the parser checks for them where they matter.
    pub(crate) fn from_str(ident: &str) -> Option<Keyword> {
        match ident {
            "as" => Some(Keyword::As),
            "async" => Some(Keyword::Async),
            "const" => Some(Keyword::Const),
            "crate" => Some(Keyword::Crate),
            "dyn" => Some(Keyword::Dyn),
            "else" => Some(Keyword::Else),
            "enum" => Some(Keyword::Enum),
            "extern" => Some(Keyword::Extern),
            "false" => Some(Keyword::False),
            "fn" => Some(Keyword::Fn),
            "for" => Some(Keyword::For),
            "if" => Some(Keyword::If),
            "impl" => Some(Keyword::Impl),
            "in" => Some(Keyword::In),
            "let" => Some(Keyword::Let),
            "loop" => Some(Keyword::Loop),
            "match" => Some(Keyword::Match),
            "mod" => Some(Keyword::Mod),
            "move" => Some(Keyword::Move),
            "mut" => Some(Keyword::Mut),
            "pub" => Some(Keyword::Pub),
            "ref" => Some(Keyword::Ref),
            "return" => Some(Keyword::Return),
            "self" => Some(Keyword::SelfValue),
            "Self" => Some(Keyword::SelfType),
            "static" => Some(Keyword::Static),
            "struct" => Some(Keyword::Struct),
            "super" => Some(Keyword::Super),
            "trait" => Some(Keyword::Trait),
            "true" => Some(Keyword::True),
            "type" => Some(Keyword::Type),
            "unsafe" => Some(Keyword::Unsafe),
            "use" => Some(Keyword::Use),
            "where" => Some(Keyword::Where),
            "while" => Some(Keyword::While),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::As => "as",
            Keyword::Async => "async",
            Keyword::Const => "const",
            Keyword::Crate => "crate",
            Keyword::Dyn => "dyn",
            Keyword::Else => "else",
            Keyword::Enum => "enum",
            Keyword::Extern => "extern",
            Keyword::False => "false",
            Keyword::Fn => "fn",
            Keyword::For => "for",
            Keyword::If => "if",
            Keyword::Impl => "impl",
            Keyword::In => "in",
            Keyword::Let => "let",
            Keyword::Loop => "loop",
            Keyword::Match => "match",
            Keyword::Mod => "mod",
            Keyword::Move => "move",
            Keyword::Mut => "mut",
            Keyword::Pub => "pub",
            Keyword::Ref => "ref",
            Keyword::Return => "return",
            Keyword::SelfValue => "self",
            Keyword::SelfType => "Self",
            Keyword::Static => "static",
            Keyword::Struct => "struct",
            Keyword::Super => "super",
            Keyword::Trait => "trait",
            Keyword::True => "true",
            Keyword::Type => "type",
            Keyword::Unsafe => "unsafe",
            Keyword::Use => "use",
            Keyword::Where => "where",
            Keyword::While => "while",
        }
    }

    /// Keywords that can start or continue a path, like `crate::foo` or `Self::BAR`.
    pub fn is_path_segment(self) -> bool {
        matches!(
            self,
            Keyword::Crate | Keyword::SelfValue | Keyword::SelfType | Keyword::Super
        )
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Delimiter {
    Paren,
    Brace,
    Bracket,
}

impl Delimiter {
    pub fn open_char(self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Brace => '{',
            Delimiter::Bracket => '[',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Brace => '}',
            Delimiter::Bracket => ']',
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Punct {
    Semi,      // ;
    Comma,     // ,
    Dot,       // .
    DotDot,    // ..
    DotDotEq,  // ..=
    DotDotDot, // ...
    Colon,     // :
    PathSep,   // ::
    RArrow,    // ->
    FatArrow,  // =>
    Pound,     // #
    Dollar,    // $
    Question,  // ?
    Tilde,     // ~
    At,        // @
    Bang,      // !

    Eq,     // =
    EqEq,   // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
    AndAnd, // &&
    OrOr,   // ||

    And,     // &
    Or,      // |
    Caret,   // ^
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Shl,     // <<
    Shr,     // >>

    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    CaretEq,   // ^=
    AndEq,     // &=
    OrEq,      // |=
    ShlEq,     // <<=
    ShrEq,     // >>=
}

impl Punct {
    pub fn as_str(self) -> &'static str {
        match self {
            Punct::Semi => ";",
            Punct::Comma => ",",
            Punct::Dot => ".",
            Punct::DotDot => "..",
            Punct::DotDotEq => "..=",
            Punct::DotDotDot => "...",
            Punct::Colon => ":",
            Punct::PathSep => "::",
            Punct::RArrow => "->",
            Punct::FatArrow => "=>",
            Punct::Pound => "#",
            Punct::Dollar => "$",
            Punct::Question => "?",
            Punct::Tilde => "~",
            Punct::At => "@",
            Punct::Bang => "!",

            Punct::Eq => "=",
            Punct::EqEq => "==",
            Punct::Ne => "!=",
            Punct::Lt => "<",
            Punct::Le => "<=",
            Punct::Gt => ">",
            Punct::Ge => ">=",
            Punct::AndAnd => "&&",
            Punct::OrOr => "||",

            Punct::And => "&",
            Punct::Or => "|",
            Punct::Caret => "^",
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::Shl => "<<",
            Punct::Shr => ">>",

            Punct::PlusEq => "+=",
            Punct::MinusEq => "-=",
            Punct::StarEq => "*=",
            Punct::SlashEq => "/=",
            Punct::PercentEq => "%=",
            Punct::CaretEq => "^=",
            Punct::AndEq => "&=",
            Punct::OrEq => "|=",
            Punct::ShlEq => "<<=",
            Punct::ShrEq => ">>=",
        }
    }

    /// Whether this can join two operands in an expression.
    pub fn is_binary_op(self) -> bool {
        matches!(
            self,
            Punct::EqEq
                | Punct::Ne
                | Punct::Lt
                | Punct::Le
                | Punct::Gt
                | Punct::Ge
                | Punct::AndAnd
                | Punct::OrOr
                | Punct::And
                | Punct::Or
                | Punct::Caret
                | Punct::Plus
                | Punct::Minus
                | Punct::Star
                | Punct::Slash
                | Punct::Percent
                | Punct::Shl
                | Punct::Shr
                | Punct::DotDot
                | Punct::DotDotEq
                | Punct::Eq
                | Punct::PlusEq
                | Punct::MinusEq
                | Punct::StarEq
                | Punct::SlashEq
                | Punct::PercentEq
                | Punct::CaretEq
                | Punct::AndEq
                | Punct::OrEq
                | Punct::ShlEq
                | Punct::ShrEq
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LiteralToken<'src> {
    /// Includes the suffix, if any.
    Int(&'src str),
    /// Includes the suffix, if any.
    Float(&'src str),
    /// The slice includes the prefix (`b`, `r#`, ...) and the quotes.
    Str(&'src str),
    /// The slice includes the prefix and the single quotes.
    Char(&'src str),
}
impl<'src> LiteralToken<'src> {
    pub fn as_str(self) -> &'src str {
        match self {
            LiteralToken::Int(s)
            | LiteralToken::Float(s)
            | LiteralToken::Str(s)
            | LiteralToken::Char(s) => s,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind<'src> {
    Keyword(Keyword),
    /// Raw identifiers keep their `r#` prefix.
    Ident(&'src str),
    /// The slice includes the leading quote.
    Lifetime(&'src str),
    OpenDelimiter(Delimiter),
    CloseDelimiter(Delimiter),
    Punct(Punct),
    Literal(LiteralToken<'src>),
}

impl<'src> TokenKind<'src> {
    pub fn as_str(self) -> &'src str {
        use Delimiter::*;
        use TokenKind::*;
        match self {
            Keyword(kw) => kw.as_str(),
            Ident(id) => id,
            Lifetime(lt) => lt,
            OpenDelimiter(Paren) => "(",
            OpenDelimiter(Bracket) => "[",
            OpenDelimiter(Brace) => "{",
            CloseDelimiter(Paren) => ")",
            CloseDelimiter(Bracket) => "]",
            CloseDelimiter(Brace) => "}",
            Punct(p) => p.as_str(),
            Literal(lit) => lit.as_str(),
        }
    }
}

impl<'src> Display for TokenKind<'src> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `'src` is the lifetime of the source code, for example.
#[derive(Debug, Clone, Copy)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub span: SourceSpan,
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Token<'_> {
    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.span.offset() + self.span.len()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/// ...`
    OuterDocLine,
    /// `//! ...`
    InnerDocLine,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    OuterDocBlock,
    /// `/*! ... */`
    InnerDocBlock,
}

impl CommentStyle {
    /// The characters that open a comment of this style.
    pub fn marker(self) -> &'static str {
        match self {
            CommentStyle::Line => "//",
            CommentStyle::OuterDocLine => "///",
            CommentStyle::InnerDocLine => "//!",
            CommentStyle::Block => "/*",
            CommentStyle::OuterDocBlock => "/**",
            CommentStyle::InnerDocBlock => "/*!",
        }
    }

    /// Inner doc comments document the enclosing item, not the next one.
    pub fn is_inner(self) -> bool {
        matches!(self, CommentStyle::InnerDocLine | CommentStyle::InnerDocBlock)
    }
}

/// A comment, kept out of the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'src> {
    /// The full text, including the markers.
    pub text: &'src str,
    pub style: CommentStyle,
    pub span: SourceSpan,
}

impl Comment<'_> {
    pub fn end(&self) -> usize {
        self.span.offset() + self.span.len()
    }
}
