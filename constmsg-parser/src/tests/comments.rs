use crate::comments::{CommentMap, LineIndex};
use crate::parse_str;

use super::*;

/// The comment texts bound to each declaration, by first name.
fn bound(src: &str) -> Vec<(String, Vec<&str>)> {
    let (ast, errors) = parse_str(src);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    ast.declarations
        .iter()
        .map(|decl| {
            let name = decl.names.first().map_or("", |id| id.name).to_string();
            (name, decl.comments.iter().map(|c| c.text).collect())
        })
        .collect()
}

#[test]
fn test_line_index() {
    let lines = LineIndex::new("ab\ncd\n\nef");
    assert_eq!(lines.line_count(), 4);
    assert_eq!(lines.line_of(0), 0);
    assert_eq!(lines.line_of(2), 0);
    assert_eq!(lines.line_of(3), 1);
    assert_eq!(lines.line_of(6), 2);
    assert_eq!(lines.line_of(7), 3);
    assert_eq!(lines.line_start(3), Some(7));
    assert_eq!(lines.line_start(4), None);
}

#[test]
fn test_leading_block() {
    assert_eq!(
        bound("// a\n// b\nconst A: u8 = 1;"),
        [("A".to_string(), vec!["// a", "// b"])]
    );
}

#[test]
fn test_blank_line_separates() {
    assert_eq!(
        bound("// a\n\nconst A: u8 = 1;"),
        [("A".to_string(), vec![])]
    );
    assert_eq!(
        bound("// a\n\n// b\nconst A: u8 = 1;"),
        [("A".to_string(), vec!["// b"])]
    );
}

#[test]
fn test_attributes() {
    assert_eq!(
        bound("// a\n#[doc(hidden)]\nconst A: u8 = 1;"),
        [("A".to_string(), vec!["// a"])]
    );
    assert_eq!(
        bound("#[allow(dead_code)]\n// a\nconst A: u8 = 1;"),
        [("A".to_string(), vec!["// a"])]
    );
    assert_eq!(
        bound("// a\n#[allow(dead_code)]\n// b\npub const A: u8 = 1;"),
        [("A".to_string(), vec!["// a", "// b"])]
    );
}

#[test]
fn test_trailing_comments() {
    assert_eq!(
        bound("const A: u8 = 1; // a\nconst B: u8 = 2;"),
        [
            ("A".to_string(), vec!["// a"]),
            ("B".to_string(), vec![]),
        ]
    );
    assert_eq!(
        bound("// a\nconst A: u8 = 1; /* b */ // c\n// d\nconst B: u8 = 2;"),
        [
            ("A".to_string(), vec!["// a", "/* b */", "// c"]),
            ("B".to_string(), vec!["// d"]),
        ]
    );
}

#[test]
fn test_own_line_after_trailing() {
    // a trailing comment only takes comments from its own line
    assert_eq!(
        bound("const A: u8 = 1; // A x\n// A more\n\nconst B: u8 = 2;"),
        [
            ("A".to_string(), vec!["// A x"]),
            ("B".to_string(), vec![]),
        ]
    );
    assert_eq!(
        bound("const A: u8 = 1; // A x\n// B y\nconst B: u8 = 2;"),
        [
            ("A".to_string(), vec!["// A x"]),
            ("B".to_string(), vec!["// B y"]),
        ]
    );
}

#[test]
fn test_enum_variants() {
    let src = "\
enum Code {
    // ErrParams err params
    ErrParams = 400,
    ErrServer = 500, // ErrServer Internal Server Error
    Last
}";
    assert_eq!(
        bound(src),
        [
            ("Code".to_string(), vec![]),
            ("ErrParams".to_string(), vec!["// ErrParams err params"]),
            (
                "ErrServer".to_string(),
                vec!["// ErrServer Internal Server Error"]
            ),
            ("Last".to_string(), vec![]),
        ]
    );
}

#[test]
fn test_inner_doc_comments_dont_bind() {
    assert_eq!(
        bound("//! crate docs\nconst A: u8 = 1;"),
        [("A".to_string(), vec![])]
    );
    assert_eq!(
        bound("/// a\n//! inner\nconst A: u8 = 1;"),
        [("A".to_string(), vec![])]
    );
}

#[test]
fn test_doc_and_block_comments() {
    assert_eq!(
        bound("/// a\n/** b */\n/* c\n d */\nconst A: u8 = 1;"),
        [("A".to_string(), vec!["/// a", "/** b */", "/* c\n d */"])]
    );
    assert_eq!(
        bound("/* a */ const A: u8 = 1;"),
        [("A".to_string(), vec!["/* a */"])]
    );
}

#[test]
fn test_comment_map_blocks() {
    let src = "// a\nconst A: u8 = 1;\n\n// dangling\n\nconst B: u8 = 2; // b\n";
    let (stream, _) = SourceReader::new(src).tokenize();
    let lines = LineIndex::new(src);
    let map = CommentMap::new(&stream, &lines);

    assert_eq!(map.blocks(), 1);
    assert_eq!(map.block_before(0).len(), 1);
    assert!(map.block_before(7).is_empty());
    assert_eq!(map.trailing(13).len(), 1);
    assert_eq!(map.trailing(13)[0].text, "// b");
}
