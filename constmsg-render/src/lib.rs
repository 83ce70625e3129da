//! Rendering an [`AnnotationTable`](constmsg_parser::AnnotationTable) as a Rust
//! lookup module and as Markdown documentation.

use std::borrow::Cow;

use askama::Template;
use constmsg_errors::{GenError, ParseError, SourceFile, TemplateError};
use constmsg_parser::format::format_source;

pub mod context;
pub mod templates;

pub use context::*;
use templates::{DocsTemplate, EntryRow, ModuleTemplate};


fn render_template<T: Template>(name: &'static str, template: &T) -> Result<String, TemplateError> {
    template.render().map_err(|err| TemplateError {
        template: name,
        source: Box::new(err),
    })
}

/// Render the lookup module for `ctx`. The result is checked and re-indented
/// by [`format_source`] before it's returned.
pub fn render_module(ctx: &RenderContext) -> Result<String, GenError> {
    let entries = ctx.table.sorted();
    let rows = entries
        .iter()
        .map(|&(name, description)| EntryRow {
            name,
            key: entry_key(ctx, name),
            description: description.into(),
        })
        .collect::<Vec<_>>();
    let template = ModuleTemplate {
        package: &ctx.package,
        value_type: &ctx.value_type,
        unknown_msg: &ctx.unknown_msg,
        entries: &rows,
    };
    let text = render_template("module", &template)?;
    let errors = match format_source(&text) {
        Ok(out) => return Ok(out),
        Err(errors) => errors
            .into_iter()
            .map(ParseError::into_owned)
            .collect::<Vec<_>>(),
    };
    Err(GenError::Format {
        src: SourceFile::new("<generated>", text),
        errors,
    })
}

/// Render the Markdown documentation for `ctx`.
pub fn render_docs(ctx: &RenderContext) -> Result<String, GenError> {
    let entries = ctx.table.sorted();
    let rows = entries
        .iter()
        .map(|&(name, description)| EntryRow {
            name,
            key: name.into(),
            description: escape_cell(description),
        })
        .collect::<Vec<_>>();
    let template = DocsTemplate {
        package: &ctx.package,
        entries: &rows,
    };
    let mut out = render_template("docs", &template)?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Enum variants are cast to the value type, unless the value type is the
/// enum itself.
fn entry_key<'a>(ctx: &'a RenderContext, name: &'a str) -> Cow<'a, str> {
    let path = ctx.table.path(name);
    match path.rsplit_once("::") {
        Some((parent, _)) if parent != ctx.value_type => {
            format!("{path} as {}", ctx.value_type).into()
        }
        _ => path.into(),
    }
}

/// Escape pipes so a description stays in its table cell.
fn escape_cell(text: &str) -> Cow<'_, str> {
    if text.contains('|') {
        text.replace('|', "\\|").into()
    } else {
        text.into()
    }
}
