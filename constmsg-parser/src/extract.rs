//! Turning declarations and their comments into a table of descriptions.

use std::fmt::{self, Display, Formatter};

use constmsg_errors::ExtractError;
use hashbrown::HashMap;
use serde::Serialize;

use crate::ast::{DeclKind, Declaration, Ident, SourceAst};
use crate::lexer::tokens::{Comment, CommentStyle};
use crate::parse_str;

/// The description of one constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationEntry {
    pub name: String,
    /// The expression the generated code uses for the constant, e.g.
    /// `Code::ErrParams` for an enum variant.
    pub path: String,
    pub description: String,
}

/// Descriptions by constant name. Iteration order is unspecified, use
/// [`AnnotationTable::sorted`] where it matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnnotationTable {
    entries: HashMap<String, String>,
    /// Paths of the names that aren't their own path.
    #[serde(skip)]
    paths: HashMap<String, String>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous description if `name` was already present.
    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) -> Option<String> {
        let name = name.into();
        self.paths.remove(&name);
        self.entries.insert(name, description.into())
    }

    /// Like [`AnnotationTable::insert`], keeping the entry's path too.
    pub fn insert_entry(&mut self, entry: AnnotationEntry) -> Option<String> {
        if entry.path == entry.name {
            self.paths.remove(&entry.name);
        } else {
            self.paths.insert(entry.name.clone(), entry.path);
        }
        self.entries.insert(entry.name, entry.description)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// How generated code refers to `name`.
    pub fn path<'a>(&'a self, name: &'a str) -> &'a str {
        self.paths.get(name).map_or(name, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries in ascending order of name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<AnnotationEntry> for AnnotationTable {
    fn from_iter<T: IntoIterator<Item = AnnotationEntry>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Extend<AnnotationEntry> for AnnotationTable {
    fn extend<T: IntoIterator<Item = AnnotationEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert_entry(entry);
        }
    }
}

/// Why a declaration has no entry in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The declaration introduces zero or several names.
    NameCount(usize),
    /// The name isn't a compile-time constant.
    NotConstant(DeclKind),
}

impl SkipReason {
    /// Check whether `decl` is a single named constant.
    pub fn classify<'src>(decl: &Declaration<'src>) -> Result<Ident<'src>, SkipReason> {
        let name = decl
            .single_name()
            .ok_or(SkipReason::NameCount(decl.names.len()))?;
        if decl.kind.is_constant() {
            Ok(name)
        } else {
            Err(SkipReason::NotConstant(decl.kind))
        }
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NameCount(0) => f.write_str("declares no names"),
            SkipReason::NameCount(n) => write!(f, "declares {n} names"),
            SkipReason::NotConstant(kind) => write!(f, "is a {kind}, not a constant"),
        }
    }
}

/// Every declaration of `ast`, with either its entry or the reason it was skipped.
pub fn annotations<'a, 'src>(
    ast: &'a SourceAst<'src>,
) -> impl Iterator<Item = (&'a Declaration<'src>, Result<AnnotationEntry, SkipReason>)> + 'a {
    ast.declarations.iter().map(|decl| {
        let entry = SkipReason::classify(decl).map(|name| AnnotationEntry {
            name: name.name.to_string(),
            path: decl.path_to(name.name),
            description: clean_comment(name.name, &decl.comments),
        });
        (decl, entry)
    })
}

/// Build a single-line description out of a comment block.
///
/// Each comment loses a leading `"<marker> <name>"` if it has one (so `// Foo the foo`
/// becomes `the foo`, and `/* Foo the foo */` loses its `*/` too) and is trimmed.
/// Comments are joined with nothing in between, then every tab, newline and
/// carriage return becomes a space.
pub fn clean_comment(name: &str, comments: &[Comment<'_>]) -> String {
    let mut description = String::new();
    for comment in comments {
        let prefix = format!("{} {name}", comment.style.marker());
        let text = match comment.text.strip_prefix(prefix.as_str()) {
            Some(rest) if is_block(comment.style) => rest.strip_suffix("*/").unwrap_or(rest),
            Some(rest) => rest,
            None => comment.text,
        };
        description.push_str(text.trim());
    }
    description.replace(['\t', '\n', '\r'], " ")
}

fn is_block(style: CommentStyle) -> bool {
    matches!(
        style,
        CommentStyle::Block | CommentStyle::OuterDocBlock | CommentStyle::InnerDocBlock
    )
}

/// Parse `src` and collect the description of every single-name constant.
pub fn extract(src: &str) -> Result<AnnotationTable, ExtractError<'_>> {
    let (ast, errors) = parse_str(src);
    if !errors.is_empty() {
        return Err(ExtractError { errors });
    }
    Ok(annotations(&ast)
        .filter_map(|(_, entry)| entry.ok())
        .collect())
}
