use super::*;

#[test]
fn test_scenario_docs() {
    let out = render_docs(&RenderContext::new("example", scenario_table())).unwrap();
    assert_eq!(
        out,
        "\
# example

<!-- Code generated by constmsg. DO NOT EDIT. -->

| Code | Description |
| ---- | ----------- |
| ErrParams | err params |
| ErrServer | Internal Server Error |
"
    );
}

#[test]
fn test_pipes_escaped() {
    let mut table = AnnotationTable::new();
    table.insert("ErrPipe", "a|b");
    let out = render_docs(&RenderContext::new("codes", table)).unwrap();
    assert!(out.contains("| ErrPipe | a\\|b |\n"));
}

#[test]
fn test_empty_docs() {
    let out = render_docs(&RenderContext::new("codes", AnnotationTable::new())).unwrap();
    assert!(out.ends_with("| ---- | ----------- |\n"));
}
