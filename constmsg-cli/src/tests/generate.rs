use std::fs;

use temp_file::TempFile;

use super::*;

const ERRCODE: &[u8] = include_bytes!("inputs/errcode.rs");

fn cli_for(input: &TempFile, output: &TempFile) -> Cli {
    Cli {
        output: Some(output.path().to_path_buf()),
        quiet: true,
        ..Cli::new(input.path(), "example")
    }
}

fn exit_code(result: anyhow::Result<()>) -> Option<i32> {
    result.err()?.downcast::<Exit>().ok().map(|Exit(code)| code)
}

#[test]
fn test_generate_module() {
    let input = temp_file::with_contents(ERRCODE);
    let output = temp_file::empty();
    let result = driver(cli_for(&input, &output));
    assert!(result.is_ok(), "failed to generate: {:?}", result.err());

    let module = fs::read_to_string(output.path()).unwrap();
    assert!(module.starts_with("// Code generated by constmsg. DO NOT EDIT.\n"));
    assert!(module.contains("use example::*;"));
    assert!(module.contains(
        "\
pub const MESSAGES: &[(i32, &str)] = &[
    (ErrNotFound, \"resource not found\"),
    (ErrParams, \"err params\"),
    (ErrServer, \"Internal Server Error\"),
];
"
    ));
    assert!(!module.contains("LAST_ERROR"));
}

#[test]
fn test_generate_docs() {
    let input = temp_file::with_contents(ERRCODE);
    let output = temp_file::empty();
    let docs = temp_file::empty();
    let cli = Cli {
        md_out: Some(docs.path().to_path_buf()),
        ..cli_for(&input, &output)
    };
    assert!(driver(cli).is_ok());

    let docs = fs::read_to_string(docs.path()).unwrap();
    assert!(docs.starts_with("# example\n"));
    assert!(docs.contains("| ErrParams | err params |\n"));
    assert!(!fs::read_to_string(output.path()).unwrap().is_empty());
}

#[test]
fn test_value_type_and_fallback() {
    let input = temp_file::with_contents(b"// Teapot i'm a teapot\nconst Teapot: u16 = 418;\n");
    let output = temp_file::empty();
    let cli = Cli {
        value_type: "u16".to_string(),
        unknown_msg: "no idea".to_string(),
        ..cli_for(&input, &output)
    };
    assert!(driver(cli).is_ok());

    let module = fs::read_to_string(output.path()).unwrap();
    assert!(module.contains("pub const UNKNOWN_MSG: &str = \"no idea\";"));
    assert!(module.contains("(Teapot, \"i'm a teapot\"),"));
    assert!(module.contains("pub fn get_msg(code: u16) -> &'static str {"));
}

#[test]
fn test_generate_from_enum() {
    let input = temp_file::with_contents(
        b"pub enum Code {\n    ErrParams = 400, // ErrParams err params\n    ErrServer = 500, // ErrServer Internal Server Error\n}\n",
    );
    let output = temp_file::empty();
    assert!(driver(cli_for(&input, &output)).is_ok());

    let module = fs::read_to_string(output.path()).unwrap();
    assert!(module.contains(
        "\
    (Code::ErrParams as i32, \"err params\"),
    (Code::ErrServer as i32, \"Internal Server Error\"),
"
    ));
}

#[test]
fn test_check() {
    let input = temp_file::with_contents(ERRCODE);
    let output = temp_file::empty();
    assert_eq!(exit_code(driver(cli_for(&input, &output))), None);

    let check = Cli {
        check: true,
        ..cli_for(&input, &output)
    };
    assert_eq!(exit_code(driver(check.clone())), None);

    fs::write(output.path(), "// stale\n").unwrap();
    assert_eq!(exit_code(driver(check)), Some(1));
    assert_eq!(fs::read_to_string(output.path()).unwrap(), "// stale\n");
}

#[test]
fn test_parse_error_writes_nothing() {
    let input = temp_file::with_contents(b"// A a\nconst A: i32 = (1;\n");
    let output = temp_file::empty();
    assert_eq!(exit_code(driver(cli_for(&input, &output))), Some(1));
    assert_eq!(fs::read_to_string(output.path()).unwrap(), "");
}

#[test]
fn test_format_error_writes_nothing() {
    let input = temp_file::with_contents(b"// Quote say \"hi\"\nconst Quote: i32 = 1;\n");
    let output = temp_file::empty();
    let docs = temp_file::empty();
    let cli = Cli {
        md_out: Some(docs.path().to_path_buf()),
        ..cli_for(&input, &output)
    };
    assert_eq!(exit_code(driver(cli)), Some(1));
    assert_eq!(fs::read_to_string(output.path()).unwrap(), "");
    assert_eq!(fs::read_to_string(docs.path()).unwrap(), "");
}

#[test]
fn test_missing_input() {
    let output = temp_file::empty();
    let cli = Cli {
        output: Some(output.path().to_path_buf()),
        quiet: true,
        ..Cli::new("src/tests/inputs/does_not_exist.rs", "example")
    };
    let err = driver(cli).unwrap_err();
    assert!(err.downcast_ref::<Exit>().is_none());
}
