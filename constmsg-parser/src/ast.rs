use std::fmt::{self, Display, Formatter};

use constmsg_errors::SourceSpan;

use crate::lexer::tokens::Comment;

/// A name introduced by a declaration. Raw identifiers keep their `r#` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'src> {
    pub name: &'src str,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Static,
    StaticMut,
    /// A fieldless enum variant, `Foo` or `Foo = 3`.
    UnitVariant,
    /// `Foo(u8)`
    TupleVariant,
    /// `Foo { x: u8 }`
    StructVariant,
    Fn,
    Struct,
    Enum,
    Union,
    Type,
    Trait,
    Mod,
    Use,
    ExternCrate,
    /// `impl` blocks and `extern` blocks, which don't introduce names.
    Block,
    /// `macro_rules!` definitions and item-position macro calls.
    Macro,
}

impl DeclKind {
    /// Whether a name declared like this is a compile-time constant.
    pub fn is_constant(self) -> bool {
        matches!(self, DeclKind::Const | DeclKind::UnitVariant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Const => "constant",
            DeclKind::Static => "static",
            DeclKind::StaticMut => "mutable static",
            DeclKind::UnitVariant => "unit variant",
            DeclKind::TupleVariant => "tuple variant",
            DeclKind::StructVariant => "struct variant",
            DeclKind::Fn => "function",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Union => "union",
            DeclKind::Type => "type alias",
            DeclKind::Trait => "trait",
            DeclKind::Mod => "module",
            DeclKind::Use => "import",
            DeclKind::ExternCrate => "extern crate",
            DeclKind::Block => "block",
            DeclKind::Macro => "macro",
        }
    }
}

impl Display for DeclKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declaration statement, with the comment block that leads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'src> {
    pub names: Vec<Ident<'src>>,
    pub kind: DeclKind,
    /// The enum a variant belongs to.
    pub parent: Option<&'src str>,
    pub comments: Vec<Comment<'src>>,
    pub span: SourceSpan,
}

impl<'src> Declaration<'src> {
    /// The declared name, if there's exactly one.
    pub fn single_name(&self) -> Option<Ident<'src>> {
        match self.names.as_slice() {
            [name] => Some(*name),
            _ => None,
        }
    }

    /// How the generated code refers to `name`: `Code::ErrParams` for a
    /// variant of `Code`, the bare name otherwise.
    pub fn path_to(&self, name: &str) -> String {
        match self.parent {
            Some(parent) => format!("{parent}::{name}"),
            None => name.to_string(),
        }
    }
}

/// The declaration-level structure of a source file.
///
/// Variants of file-level enums come right after the enum itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceAst<'src> {
    pub declarations: Vec<Declaration<'src>>,
}

impl<'src> SourceAst<'src> {
    pub fn new(declarations: Vec<Declaration<'src>>) -> Self {
        Self { declarations }
    }

    pub fn nodes(&self) -> usize {
        self.declarations.len()
    }
}
