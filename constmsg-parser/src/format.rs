//! A small source formatter for generated code.
//!
//! The input has to lex and parse as a sequence of items. Each line is then
//! re-indented by four spaces per delimiter it's nested in, trailing whitespace
//! is removed, runs of blank lines are collapsed into one, and the output ends
//! with a single newline. Lines that start or end inside a token or comment
//! spanning several lines are left untouched, so string contents never change.

use constmsg_errors::ParseError;

use crate::lexer::tokens::TokenKind;
use crate::lexer::SourceReader;
use crate::parser::Parser;

const INDENT: &str = "    ";

pub fn format_source(src: &str) -> Result<String, Vec<ParseError<'_>>> {
    let mut reader = SourceReader::new(src);
    let (stream, mut errors) = reader.tokenize();
    let tokens = stream.tokens.clone();
    let multiline = stream
        .tokens
        .iter()
        .map(|tok| (tok.span.offset(), tok.end()))
        .chain(
            stream
                .comments
                .iter()
                .map(|comment| (comment.span.offset(), comment.end())),
        )
        .filter(|&(start, end)| src[start..end].contains('\n'))
        .collect::<Vec<_>>();

    let mut parser = Parser::new(stream);
    parser.next();
    let (_, parse_errors) = parser.parse();
    errors.extend(parse_errors);
    if !errors.is_empty() {
        errors.sort_by_key(|err| err.loc().offset());
        return Err(errors);
    }

    let mut out = String::with_capacity(src.len());
    let mut depth = 0usize;
    let mut next_tok = 0;
    let mut pending_blank = false;
    let mut line_start = 0;

    for line in src.split('\n') {
        let line_end = line_start + line.len();

        while let Some(tok) = tokens.get(next_tok).filter(|tok| tok.span.offset() < line_start) {
            match tok.kind {
                TokenKind::OpenDelimiter(_) => depth += 1,
                TokenKind::CloseDelimiter(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            next_tok += 1;
        }

        let verbatim = multiline.iter().any(|&(start, end)| {
            (start < line_start && line_start < end) || (start < line_end && line_end < end)
        });

        if verbatim {
            if pending_blank {
                out.push('\n');
                pending_blank = false;
            }
            out.push_str(line);
            out.push('\n');
        } else {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                pending_blank = !out.is_empty();
            } else {
                if pending_blank {
                    out.push('\n');
                    pending_blank = false;
                }
                let closes = tokens
                    .get(next_tok)
                    .filter(|tok| tok.span.offset() < line_end)
                    .is_some_and(|tok| matches!(tok.kind, TokenKind::CloseDelimiter(_)));
                let level = if closes { depth.saturating_sub(1) } else { depth };
                for _ in 0..level {
                    out.push_str(INDENT);
                }
                out.push_str(trimmed);
                out.push('\n');
            }
        }

        line_start = line_end + 1;
    }

    Ok(out)
}
