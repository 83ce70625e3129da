use crate::SourceFile;
use miette::{Diagnostic, SourceSpan};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// What the parser found where it expected something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserFound<'src> {
    Eof,
    Str(Cow<'src, str>),
}
impl ParserFound<'_> {
    pub fn into_owned(self) -> ParserFound<'static> {
        match self {
            Self::Eof => ParserFound::Eof,
            Self::Str(s) => ParserFound::Str(Cow::Owned(s.into_owned())),
        }
    }
}
impl fmt::Display for ParserFound<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => f.write_str("end of input"),
            Self::Str(s) => write!(f, "`{s}`"),
        }
    }
}

/// Errors found while lexing or parsing Rust source.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError<'src> {
    #[error("unexpected character {ch:?}")]
    UnexpectedChar {
        ch: char,
        #[label]
        loc: SourceSpan,
    },
    #[error("unterminated string literal")]
    UnterminatedString {
        #[label("string starts here")]
        loc: SourceSpan,
    },
    #[error("unterminated character literal")]
    UnterminatedChar {
        #[label("character literal starts here")]
        loc: SourceSpan,
    },
    #[error("unterminated block comment")]
    UnterminatedComment {
        #[label("comment starts here")]
        loc: SourceSpan,
    },
    #[error("unknown character escape `{escape}`")]
    #[diagnostic(help("a literal backslash is written as `\\\\`"))]
    InvalidEscape {
        escape: Cow<'src, str>,
        #[label]
        loc: SourceSpan,
    },
    #[error("invalid number literal `{lit}`")]
    InvalidNumber {
        lit: Cow<'src, str>,
        #[label("{reason}")]
        loc: SourceSpan,
        reason: &'static str,
    },
    #[error("expected {ex}, found {found}")]
    ExpectedFound {
        ex: &'static str,
        found: ParserFound<'src>,
        #[label("expected {ex}")]
        loc: SourceSpan,
    },
    #[error("unclosed delimiter `{delim}`")]
    UnclosedDelimiter {
        delim: char,
        #[label("this is never closed")]
        loc: SourceSpan,
    },
    #[error("mismatched closing delimiter `{close}`")]
    MismatchedDelimiter {
        open: char,
        close: char,
        #[label("expected `{}` to match this", closing_for(*.open))]
        open_loc: SourceSpan,
        #[label("found `{close}`")]
        loc: SourceSpan,
    },
    #[error("unexpected closing delimiter `{delim}`")]
    UnexpectedCloseDelimiter {
        delim: char,
        #[label("nothing to close here")]
        loc: SourceSpan,
    },
}
fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}
impl<'src> ParseError<'src> {
    /// Detach the error from the source it was found in, so it can outlive it.
    pub fn into_owned(self) -> ParseError<'static> {
        use ParseError::*;
        match self {
            UnexpectedChar { ch, loc } => UnexpectedChar { ch, loc },
            UnterminatedString { loc } => UnterminatedString { loc },
            UnterminatedChar { loc } => UnterminatedChar { loc },
            UnterminatedComment { loc } => UnterminatedComment { loc },
            InvalidEscape { escape, loc } => InvalidEscape {
                escape: Cow::Owned(escape.into_owned()),
                loc,
            },
            InvalidNumber { lit, loc, reason } => InvalidNumber {
                lit: Cow::Owned(lit.into_owned()),
                loc,
                reason,
            },
            ExpectedFound { ex, found, loc } => ExpectedFound {
                ex,
                found: found.into_owned(),
                loc,
            },
            UnclosedDelimiter { delim, loc } => UnclosedDelimiter { delim, loc },
            MismatchedDelimiter {
                open,
                close,
                open_loc,
                loc,
            } => MismatchedDelimiter {
                open,
                close,
                open_loc,
                loc,
            },
            UnexpectedCloseDelimiter { delim, loc } => UnexpectedCloseDelimiter { delim, loc },
        }
    }
    /// Location of the primary label.
    pub fn loc(&self) -> SourceSpan {
        use ParseError::*;
        match self {
            UnexpectedChar { loc, .. }
            | UnterminatedString { loc }
            | UnterminatedChar { loc }
            | UnterminatedComment { loc }
            | InvalidEscape { loc, .. }
            | InvalidNumber { loc, .. }
            | ExpectedFound { loc, .. }
            | UnclosedDelimiter { loc, .. }
            | MismatchedDelimiter { loc, .. }
            | UnexpectedCloseDelimiter { loc, .. } => *loc,
        }
    }
}

/// The input file couldn't be parsed, so no annotations could be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("failed to parse input ({} error{})", .errors.len(), if .errors.len() == 1 {""} else {"s"})]
pub struct ExtractError<'src> {
    #[related]
    pub errors: Vec<ParseError<'src>>,
}
impl ExtractError<'_> {
    pub fn into_owned(self) -> ExtractError<'static> {
        ExtractError {
            errors: self.errors.into_iter().map(ParseError::into_owned).collect(),
        }
    }
}

/// Rendering one of the built-in templates failed. This is a bug in the
/// generator, not in its input.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to render the {template} template")]
pub struct TemplateError {
    pub template: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Errors from generating output files.
#[derive(Debug, Error, Diagnostic)]
pub enum GenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),
    #[error("generated module source is not valid Rust")]
    #[diagnostic(help(
        "a description probably contains a character that breaks its string literal, such as `\"`"
    ))]
    Format {
        #[source_code]
        src: SourceFile,
        #[related]
        errors: Vec<ParseError<'static>>,
    },
}
