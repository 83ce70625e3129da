//! Template structs bound to the files under `templates/`.
//! Each struct is built fresh for one render call.

use std::borrow::Cow;

use askama::Template;

/// One row of the output, in the order it's rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow<'a> {
    pub name: &'a str,
    /// The expression standing for the constant in generated code.
    pub key: Cow<'a, str>,
    pub description: Cow<'a, str>,
}

/// The generated lookup module, before formatting.
#[derive(Template, Debug)]
#[template(path = "module.rs", escape = "none")]
pub struct ModuleTemplate<'a> {
    /// Module path the constants are imported from
    pub package: &'a str,
    /// Type of the constants and of `get_msg`'s argument
    pub value_type: &'a str,
    pub unknown_msg: &'a str,
    pub entries: &'a [EntryRow<'a>],
}

/// The Markdown table of codes.
#[derive(Template, Debug)]
#[template(path = "docs.md", escape = "none")]
pub struct DocsTemplate<'a> {
    pub package: &'a str,
    pub entries: &'a [EntryRow<'a>],
}
