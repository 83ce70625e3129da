use clap::CommandFactory;

use super::*;

#[test]
fn test_command() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_flags() {
    let cli = Cli::try_parse_from([
        "constmsg",
        "--file",
        "src/errcode.rs",
        "--package",
        "example",
        "-t",
        "u16",
        "-m",
        "-v",
    ])
    .unwrap();
    assert_eq!(cli.value_type, "u16");
    assert_eq!(cli.unknown_msg, DEFAULT_UNKNOWN_MSG);
    assert_eq!(cli.verbosity(), Verbosity::Verbose);
    assert_eq!(cli.output_path(), Path::new("src/errcode_msg_gen.rs"));
    assert_eq!(cli.docs_path().as_deref(), Some(Path::new("src/errcode_msg_gen.md")));

    assert!(Cli::try_parse_from([
        "constmsg", "--file", "a.rs", "--package", "a", "-q", "-v"
    ])
    .is_err());
}

#[test]
fn test_default_output_path() {
    assert_eq!(
        default_output_path(Path::new("src/errcode.rs"), "rs"),
        Path::new("src/errcode_msg_gen.rs")
    );
    assert_eq!(
        default_output_path(Path::new("errcode.rs"), "md"),
        Path::new("errcode_msg_gen.md")
    );
    assert_eq!(
        default_output_path(Path::new("codes.v1.rs"), "rs"),
        Path::new("codes.v1_msg_gen.rs")
    );
    assert_eq!(
        default_output_path(Path::new("errcode"), "rs"),
        Path::new("errcode_msg_gen.rs")
    );
}

#[test]
fn test_docs_path() {
    let mut cli = Cli::new("codes.rs", "codes");
    assert_eq!(cli.docs_path(), None);
    cli.md_out = Some(PathBuf::from("docs/codes.md"));
    assert_eq!(cli.docs_path(), Some(PathBuf::from("docs/codes.md")));
    cli.md_out = None;
    cli.markdown = true;
    assert_eq!(cli.docs_path(), Some(PathBuf::from("codes_msg_gen.md")));
    assert_eq!(cli.verbosity(), Verbosity::Normal);
}
