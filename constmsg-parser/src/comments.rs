//! Binding comments to the items they document.
//!
//! Comments aren't part of the token stream, so this is done with a pass over
//! the comment arena: consecutive comments that each sit on their own line
//! form a block, and a block belongs to whichever token comes right after it,
//! as long as that token is on the block's last line or the one after.
//! The parser asks for the block in front of an item's first token.
//!
//! A comment that follows code on the same line is a trailing comment of the
//! token before it, as in `Foo = 1, // the foo code`. The parser picks these up
//! for the last token of each item.

use hashbrown::HashMap;

use crate::lexer::tokenizer::TokenStream;
use crate::lexer::tokens::{Comment, Token};

/// Byte offsets of the start of each line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    /// Zero-based line of a byte offset.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

/// A run of comments, as a range into the comment arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommentBlock {
    first: usize,
    last: usize,
    last_line: usize,
}

pub struct CommentMap<'src> {
    comments: std::rc::Rc<[Comment<'src>]>,
    /// Index of the token after a block, to the block.
    by_token: HashMap<usize, CommentBlock>,
    /// Index of a token, to the comments trailing it on its line.
    trailing: HashMap<usize, CommentBlock>,
}

impl<'src> CommentMap<'src> {
    pub fn new(stream: &TokenStream<'src>, lines: &LineIndex) -> Self {
        let tokens: &[Token] = &stream.tokens;
        let comments = stream.comments.clone();
        let mut by_token = HashMap::new();
        let mut trailing_by_token: HashMap<usize, CommentBlock> = HashMap::new();

        // index of the first token at or after `offset`
        let token_after = |offset: usize| tokens.partition_point(|tok| tok.span.offset() < offset);

        let mut current: Option<CommentBlock> = None;
        let close = |block: Option<CommentBlock>, by_token: &mut HashMap<usize, CommentBlock>| {
            let Some(block) = block else { return };
            let end = comments[block.last].end();
            let next = token_after(end);
            if let Some(tok) = tokens.get(next) {
                let line = lines.line_of(tok.span.offset());
                if line == block.last_line || line == block.last_line + 1 {
                    by_token.insert(next, block);
                }
            }
        };

        for (idx, comment) in comments.iter().enumerate() {
            let first_line = lines.line_of(comment.span.offset());
            let last_line = lines.line_of(comment.end().saturating_sub(1).max(comment.span.offset()));

            // Is there code before the comment on its line?
            let prev_token = token_after(comment.span.offset()).checked_sub(1);
            let trailing = prev_token.is_some_and(|t| lines.line_of(tokens[t].end().saturating_sub(1)) == first_line);

            if trailing || comment.style.is_inner() {
                close(current.take(), &mut by_token);
                if let Some(tok) = prev_token.filter(|_| trailing && !comment.style.is_inner()) {
                    trailing_by_token
                        .entry(tok)
                        .and_modify(|block| {
                            block.last = idx;
                            block.last_line = last_line;
                        })
                        .or_insert(CommentBlock {
                            first: idx,
                            last: idx,
                            last_line,
                        });
                }
                continue;
            }

            current = match current {
                Some(block)
                    if first_line <= block.last_line + 1
                        && token_after(comments[block.last].end()) == token_after(comment.span.offset()) =>
                {
                    Some(CommentBlock {
                        last: idx,
                        last_line,
                        ..block
                    })
                }
                prev => {
                    close(prev, &mut by_token);
                    Some(CommentBlock {
                        first: idx,
                        last: idx,
                        last_line,
                    })
                }
            };
        }
        close(current, &mut by_token);

        Self {
            comments,
            by_token,
            trailing: trailing_by_token,
        }
    }

    /// The comment block that leads the token at `token_idx`, if there is one.
    pub fn block_before(&self, token_idx: usize) -> &[Comment<'src>] {
        self.by_token
            .get(&token_idx)
            .map_or(&[], |block| &self.comments[block.first..=block.last])
    }

    /// The comments after the token at `token_idx` on the same line.
    pub fn trailing(&self, token_idx: usize) -> &[Comment<'src>] {
        self.trailing
            .get(&token_idx)
            .map_or(&[], |block| &self.comments[block.first..=block.last])
    }

    pub fn blocks(&self) -> usize {
        self.by_token.len()
    }
}
