use constmsg_errors::{ParseError, Report};

use crate::lexer::SourceReader;
use crate::parser::Parser;

mod comments;
mod parser;

/// Run `parse_fn` on a parser positioned at the start of `src`, and check that
/// it consumed everything without errors.
fn test_parser_fn<T, F>(src: &'static str, show_output: bool, parse_fn: F) -> T
where
    T: std::fmt::Debug + 'static,
    F: FnOnce(&mut Parser<'static>, &mut Vec<ParseError<'static>>) -> T,
{
    let (value, errors, done) = run_parser_fn(src, parse_fn);

    if show_output {
        for e in errors.iter().take(5) {
            let printable_e = Report::from(e.clone()).with_source_code(src);
            println!("{:?}", printable_e);
        }
    }

    assert!(errors.is_empty(), "unexpected errors in {src:?}: {errors:?}");
    assert!(done, "{src:?} wasn't fully consumed, got {value:?}");
    value
}

/// Like `test_parser_fn`, but for input that should be rejected.
fn test_parser_errors<T, F>(src: &'static str, parse_fn: F) -> Vec<ParseError<'static>>
where
    F: FnOnce(&mut Parser<'static>, &mut Vec<ParseError<'static>>) -> T,
{
    let (_, errors, _) = run_parser_fn(src, parse_fn);
    assert!(!errors.is_empty(), "expected errors in {src:?}");
    errors
}

fn run_parser_fn<T, F>(src: &'static str, parse_fn: F) -> (T, Vec<ParseError<'static>>, bool)
where
    F: FnOnce(&mut Parser<'static>, &mut Vec<ParseError<'static>>) -> T,
{
    let mut reader = SourceReader::new(src);
    let (tokens, mut errors) = reader.tokenize();

    let mut parser = Parser::new(tokens);
    parser.next();
    let value = parse_fn(&mut parser, &mut errors);
    (value, errors, parser.is_done())
}
