//! Reading the declarations of a Rust source file, and the comments that
//! document them.
//!
//! The pipeline is [`lexer`] → [`comments`] → [`parser`], and [`extract`] turns the
//! result into an [`AnnotationTable`]. [`format`] reuses the same front end to
//! check and re-indent generated code.

use constmsg_errors::ParseError;

pub mod ast;
pub mod comments;
pub mod extract;
pub mod format;
pub mod lexer;
pub mod parser;

pub use ast::{DeclKind, Declaration, Ident, SourceAst};
pub use extract::{clean_comment, extract, AnnotationEntry, AnnotationTable, SkipReason};

#[cfg(test)]
mod tests;

/// Lex and parse `src`. Errors from both passes are returned together, ordered
/// by where they occur.
pub fn parse_str(src: &str) -> (SourceAst<'_>, Vec<ParseError<'_>>) {
    let mut reader = lexer::SourceReader::new(src);
    let (tokens, mut errors) = reader.tokenize();

    let mut parser = parser::Parser::new(tokens);
    parser.next();
    let (ast, parse_errors) = parser.parse();

    errors.extend(parse_errors);
    errors.sort_by_key(|err| err.loc().offset());
    (ast, errors)
}
