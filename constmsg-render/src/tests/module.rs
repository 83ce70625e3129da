use constmsg_errors::{GenError, ParseError};

use super::*;

// the scenario's enum, for the golden output to compile against
#[allow(dead_code)]
enum Code {
    ErrParams = 400,
    ErrServer = 500,
}

mod generated {
    include!("outputs/scenario_msg_gen.rs");
}

#[test]
fn test_scenario_output() {
    let ctx = RenderContext::new("super", scenario_table());
    let out = render_module(&ctx).unwrap();
    assert_eq!(out, include_str!("outputs/scenario_msg_gen.rs"));
}

#[test]
fn test_generated_lookup() {
    assert_eq!(generated::get_msg(400), "err params");
    assert_eq!(generated::get_msg(500), "Internal Server Error");
    assert_eq!(generated::get_msg(999), "unknown error");
    assert_eq!(generated::get_msg(-1), generated::UNKNOWN_MSG);
    assert_eq!(generated::MESSAGES.len(), 2);
}

#[test]
fn test_deterministic() {
    let ctx = RenderContext::new("example", scenario_table()).with_value_type("u16");
    let first = render_module(&ctx).unwrap();
    let second = render_module(&ctx.clone()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("use example::*;"));
    assert!(first.contains("pub const MESSAGES: &[(u16, &str)] = &["));
    assert!(first.contains("pub fn get_msg(code: u16) -> &'static str {"));
}

#[test]
fn test_variant_keys() {
    let out = render_module(&RenderContext::new("codes", scenario_table()).with_value_type("u16")).unwrap();
    assert!(out.contains("    (Code::ErrParams as u16, \"err params\"),\n"));

    // no cast when the codes are the enum itself
    let out = render_module(&RenderContext::new("codes", scenario_table()).with_value_type("Code")).unwrap();
    assert!(out.contains("pub const MESSAGES: &[(Code, &str)] = &["));
    assert!(out.contains("    (Code::ErrServer, \"Internal Server Error\"),\n"));

    // constants are used as they are
    let table = extract("// ErrParams err params\nconst ErrParams: i32 = 400;").unwrap();
    let out = render_module(&RenderContext::new("codes", table)).unwrap();
    assert!(out.contains("    (ErrParams, \"err params\"),\n"));
}

#[test]
fn test_sorted_entries() {
    let table = ["Zeta", "Alpha", "Mid"]
        .into_iter()
        .map(|name| (name, name.to_lowercase()))
        .fold(AnnotationTable::new(), |mut table, (name, desc)| {
            table.insert(name, desc);
            table
        });
    let out = render_module(&RenderContext::new("codes", table)).unwrap();
    let alpha = out.find("(Alpha, \"alpha\"),").unwrap();
    let mid = out.find("(Mid, \"mid\"),").unwrap();
    let zeta = out.find("(Zeta, \"zeta\"),").unwrap();
    assert!(alpha < mid && mid < zeta);
}

#[test]
fn test_empty_table() {
    let ctx = RenderContext::new("codes", AnnotationTable::new()).with_unknown_msg("no such code");
    let out = render_module(&ctx).unwrap();
    assert!(out.contains("= &[\n];\n"));
    assert!(out.contains("pub const UNKNOWN_MSG: &str = \"no such code\";"));
    assert!(out.ends_with("}\n"));
}

#[test]
fn test_quote_in_description() {
    let mut table = AnnotationTable::new();
    table.insert("ErrQuote", "say \"hi\"");
    let err = render_module(&RenderContext::new("codes", table)).unwrap_err();
    match err {
        GenError::Format { src, errors } => {
            assert!(src.contents().contains("say \"hi\""));
            assert!(matches!(
                errors.as_slice(),
                [ParseError::ExpectedFound { .. }, ..]
            ));
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_unterminated_unknown_msg() {
    let ctx = RenderContext::new("codes", AnnotationTable::new()).with_unknown_msg("\\");
    assert!(matches!(
        render_module(&ctx),
        Err(GenError::Format { .. })
    ));
}

#[test]
fn test_invalid_escape_in_description() {
    for description in [r"must match \d+", r"bad \u{zz}"] {
        let mut table = AnnotationTable::new();
        table.insert("ErrPattern", description);
        match render_module(&RenderContext::new("codes", table)) {
            Err(GenError::Format { src, errors }) => {
                assert!(src.contents().contains(description));
                assert!(matches!(
                    errors.as_slice(),
                    [ParseError::InvalidEscape { .. }]
                ));
            }
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    let mut table = AnnotationTable::new();
    table.insert("ErrPattern", r"tab\tthen \u{e9}");
    assert!(render_module(&RenderContext::new("codes", table)).is_ok());
}
