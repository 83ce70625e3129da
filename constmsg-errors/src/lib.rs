pub use miette::{self, Report, SourceSpan};
pub mod error;
pub use error::*;
pub mod files;
pub use files::SourceFile;
pub mod color;

pub fn merge_spans(a: SourceSpan, b: SourceSpan) -> SourceSpan {
    use std::cmp::{max, min};
    let start = min(a.offset(), b.offset());
    let end = max(a.offset() + a.len(), b.offset() + b.len());
    (start, end - start).into()
}
