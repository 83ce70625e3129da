use miette::{MietteError, SourceCode, SourceSpan, SpanContents};

/// Wrapper around a span to optionally add a name
struct MaybeNamed<'a>(Box<dyn SpanContents<'a> + 'a>, Option<&'a str>);
impl<'a> SpanContents<'a> for MaybeNamed<'a> {
    fn data(&self) -> &'a [u8] {
        self.0.data()
    }
    fn span(&self) -> &SourceSpan {
        self.0.span()
    }
    fn line(&self) -> usize {
        self.0.line()
    }
    fn column(&self) -> usize {
        self.0.column()
    }
    fn line_count(&self) -> usize {
        self.0.line_count()
    }
    fn name(&self) -> Option<&str> {
        self.1
    }
}

/// A named piece of source text, used as the source code of reports.
/// It's like `miette::NamedSource`, but it's unnamed if the name is an empty string,
/// and the contents can be borrowed back out for parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    name: Box<str>,
    contents: Box<str>,
}
impl SourceFile {
    pub fn new(name: impl Into<Box<str>>, contents: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
    /// Get the name of the file.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Get the contents of the file.
    pub fn contents(&self) -> &str {
        &self.contents
    }
    /// Return the (zero-based) line and column of a byte offset
    pub fn source_loc(&self, loc: usize) -> Result<(usize, usize), MietteError> {
        let span = self.contents.read_span(&loc.into(), 0, 0)?;
        Ok((span.line(), span.column()))
    }
}
impl SourceCode for SourceFile {
    fn read_span<'a>(
        &'a self,
        span: &SourceSpan,
        clb: usize,
        cla: usize,
    ) -> Result<Box<dyn SpanContents<'a> + 'a>, MietteError> {
        Ok(Box::new(MaybeNamed(
            self.contents.read_span(span, clb, cla)?,
            (!self.name.is_empty()).then_some(&*self.name),
        )))
    }
}
