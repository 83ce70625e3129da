use crate::ast::DeclKind;
use crate::parse_str;

use super::*;

fn decls(src: &str) -> Vec<(DeclKind, Vec<&str>)> {
    let (ast, errors) = parse_str(src);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    ast.declarations
        .iter()
        .map(|decl| (decl.kind, decl.names.iter().map(|id| id.name).collect()))
        .collect()
}

#[test]
fn test_codes_file() {
    let src = include_str!("inputs/codes.rs");
    let ast = test_parser_fn(src, true, |parser, errors| {
        let (ast, parse_errors) = parser.parse();
        errors.extend(parse_errors);
        ast
    });
    assert_eq!(ast.nodes(), 16);

    use DeclKind::*;
    assert_eq!(
        decls(src),
        [
            (Use, vec!["fmt"]),
            (Const, vec!["CLIENT_BASE"]),
            (Const, vec!["ErrParams"]),
            (Const, vec!["ErrNotFound"]),
            (Const, vec!["ErrServer"]),
            (StaticMut, vec!["REQUESTS"]),
            (Const, vec!["ErrTimeout"]),
            (Enum, vec!["Status"]),
            (UnitVariant, vec!["Ok"]),
            (UnitVariant, vec!["Created"]),
            (UnitVariant, vec!["Accepted"]),
            (TupleVariant, vec!["Redirect"]),
            (Block, vec![]),
            (Fn, vec!["is_client_error"]),
            (Macro, vec!["codes"]),
            (Const, vec!["ALL"]),
        ]
    );
}

#[test]
fn test_item_kinds() {
    use DeclKind::*;
    let src = "\
#![allow(dead_code)]
extern crate alloc;
extern crate std as core2;
mod inner;
pub(crate) mod outer { const HIDDEN: u8 = 0; }
struct Unit;
struct Pair(u8, u8);
pub struct Named<T> where T: Copy { x: T }
union Bits { i: u32, f: f32 }
type Alias<'a> = &'a str;
trait Describe { fn describe(&self) -> &str; }
unsafe impl<T: Send> Send for Named<T> {}
const fn double(x: u32) -> u32 { x * 2 }
pub async unsafe fn nothing() {}
extern \"C\" { fn puts(s: *const u8) -> i32; }
extern \"C\" fn callback() {}
static GREETING: &str = \"hi\";
const _: () = ();
thread_local! { static DEPTH: u8 = 0; }
enum Shape { Circle { r: f32 }, Square(f32), Empty }
";
    assert_eq!(
        decls(src),
        [
            (ExternCrate, vec!["alloc"]),
            (ExternCrate, vec!["core2"]),
            (Mod, vec!["inner"]),
            (Mod, vec!["outer"]),
            (Struct, vec!["Unit"]),
            (Struct, vec!["Pair"]),
            (Struct, vec!["Named"]),
            (Union, vec!["Bits"]),
            (Type, vec!["Alias"]),
            (Trait, vec!["Describe"]),
            (Block, vec![]),
            (Fn, vec!["double"]),
            (Fn, vec!["nothing"]),
            (Block, vec![]),
            (Fn, vec!["callback"]),
            (Static, vec!["GREETING"]),
            (Const, vec![]),
            (Macro, vec![]),
            (Enum, vec!["Shape"]),
            (StructVariant, vec!["Circle"]),
            (TupleVariant, vec!["Square"]),
            (UnitVariant, vec!["Empty"]),
        ]
    );
}

#[test]
fn test_use_trees() {
    test_parser_fn("use std::fmt;", true, |parser, errors| {
        parser.parse_use(errors)
    });

    assert_eq!(
        decls("use std::{fmt, io::{self, Read as R}, collections::*};"),
        [(DeclKind::Use, vec!["fmt", "io", "R"])]
    );
    assert_eq!(decls("use a::b as _;"), [(DeclKind::Use, vec![])]);
    assert_eq!(decls("pub use ::c::d;"), [(DeclKind::Use, vec!["d"])]);
    assert_eq!(decls("use crate::e::*;"), [(DeclKind::Use, vec![])]);
    assert_eq!(decls("use self::f;"), [(DeclKind::Use, vec!["f"])]);
}

#[test]
fn test_parse_const() {
    let (kind, names) = test_parser_fn("const A: u8 = 1;", true, |parser, errors| {
        parser.parse_const(errors)
    });
    assert_eq!(kind, DeclKind::Const);
    assert_eq!(names[0].name, "A");

    test_parser_fn(
        "const B: &[(i32, &str)] = &[(A, \"a\"), (C, \"c\")];",
        true,
        |parser, errors| parser.parse_const(errors),
    );

    test_parser_fn(
        "const C: Option<Vec<u8>> = None;",
        true,
        |parser, errors| parser.parse_const(errors),
    );
}

#[test]
fn test_enum_delimiters_skipped() {
    assert_eq!(
        decls("enum E<T = (u8, [u8; 2])> where T: Fn(u8) { A, B(T) }"),
        [
            (DeclKind::Enum, vec!["E"]),
            (DeclKind::UnitVariant, vec!["A"]),
            (DeclKind::TupleVariant, vec!["B"]),
        ]
    );

    // a broken variant is skipped up to the next comma, nested groups included
    let (ast, errors) = parse_str("enum E { 1 (a, b) [c], B }");
    assert_eq!(errors.len(), 1);
    let names = ast
        .declarations
        .iter()
        .flat_map(|decl| decl.names.iter().map(|id| id.name))
        .collect::<Vec<_>>();
    assert_eq!(names, ["E", "B"]);
}

#[test]
fn test_generics_before_eq() {
    // no space between the closing `>` and the `=`
    assert_eq!(
        decls("const A: Option<u8>= None;\nconst B: Option<Option<u8>>= None;\nstatic C: Vec<u8>= Vec::new();"),
        [
            (DeclKind::Const, vec!["A"]),
            (DeclKind::Const, vec!["B"]),
            (DeclKind::Static, vec!["C"]),
        ]
    );

    let (_, errors) = parse_str("const A: u8 >= 1;");
    assert!(!errors.is_empty());
}

#[test]
fn test_parse_static() {
    let (kind, _) = test_parser_fn("static mut N: u64 = 0;", true, |parser, errors| {
        parser.parse_static(errors)
    });
    assert_eq!(kind, DeclKind::StaticMut);
}

#[test]
fn test_parse_expr() {
    for src in [
        "1 + 2 * 3",
        "-x as u8 + 1",
        "!FLAG && (a || b)",
        "Foo::BAR",
        "<T as Trait>::CONST",
        "Vec::<u8>::new()",
        "x.len().min(3)?",
        "t.0.1",
        "[0u8; 4]",
        "[1, 2, 3,]",
        "Point { x: 1, y: 2 }",
        "format!(\"{}\", 1)",
        "unsafe { std::mem::zeroed() }",
        "const { 1 + 1 }",
        "if a { 1 } else if b { 2 } else { 3 }",
        "match x { 1 => \"one\", _ => \"many\" }",
        "|a, b| a + b",
        "move || -> u8 { 1 }",
        "&mut data[1..]",
        "'outer: loop { break 'outer 1 }",
        "..=5",
        "r#\"raw \"text\"\"#",
    ] {
        test_parser_fn(src, true, |parser, errors| parser.parse_expr(errors));
    }
}

#[test]
fn test_parse_type() {
    for src in [
        "u8",
        "&'static str",
        "Vec<Vec<u8>>",
        "[u8; 4]",
        "fn(u8) -> u8",
        "*const u8",
        "(i32, &str)",
        "Box<dyn Fn() -> u8 + Send>",
    ] {
        test_parser_fn(src, true, |parser, errors| parser.parse_type(errors));
    }
}

#[test]
fn test_adjacent_operands() {
    // a quote in the middle of a string literal splits it in two
    let errors = test_parser_errors("const A: &str = \"say \"hi\"\";", |parser, errors| {
        parser.parse_const(errors)
    });
    assert!(matches!(
        errors.as_slice(),
        [ParseError::ExpectedFound { ex: "';'", .. }]
    ));

    test_parser_errors("const A: u8 = 1 2;", |parser, errors| {
        parser.parse_const(errors)
    });
}

#[test]
fn test_delimiter_errors() {
    let (_, errors) = parse_str("fn f() {");
    assert!(matches!(
        errors.as_slice(),
        [ParseError::UnclosedDelimiter { delim: '{', .. }]
    ));

    let (_, errors) = parse_str("fn f() { (] }");
    assert!(matches!(
        errors.first(),
        Some(ParseError::MismatchedDelimiter {
            open: '(',
            close: ']',
            ..
        })
    ));

    let (_, errors) = parse_str("const A: u8 = 1; }");
    assert!(matches!(
        errors.as_slice(),
        [ParseError::UnexpectedCloseDelimiter { delim: '}', .. }]
    ));
}

#[test]
fn test_recovery() {
    // one error per broken item, and the good items still come through
    let src = "const A: u8 = ;\nconst B: u8 = 2;\nlet c = 3;\nconst D: u8 = 4;";
    let (ast, errors) = parse_str(src);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].loc().offset() < errors[1].loc().offset());

    let names = ast
        .declarations
        .iter()
        .flat_map(|decl| decl.names.iter().map(|id| id.name))
        .collect::<Vec<_>>();
    assert_eq!(names, ["A", "B", "D"]);
}

#[test]
fn test_missing_semicolon_at_eof() {
    let (_, errors) = parse_str("const A: u8 = 1");
    assert!(matches!(
        errors.as_slice(),
        [ParseError::ExpectedFound {
            ex: "';'",
            found: constmsg_errors::ParserFound::Eof,
            ..
        }]
    ));
}
