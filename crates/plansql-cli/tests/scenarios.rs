//! End-to-end output checks driving the command implementations with
//! in-memory plan documents and writers.

use plansql_cli::{commands, input};
use plansql_core::MismatchPolicy;

const SHOWPLAN_NS: &str = "http://schemas.microsoft.com/sqlserver/2004/07/showplan";

fn plan(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<ShowPlanXML xmlns="{SHOWPLAN_NS}" Version="1.539">
  <BatchSequence><Batch><Statements>{body}</Statements></Batch></BatchSequence>
</ShowPlanXML>"#
    )
}

fn one_param_plan() -> String {
    plan(
        r#"<StmtSimple StatementText="SELECT * FROM T WHERE id = @id">
  <QueryPlan><ParameterList>
    <ColumnReference Column="@id" ParameterDataType="int" ParameterCompiledValue="42"/>
  </ParameterList></QueryPlan>
</StmtSimple>"#,
    )
}

fn run_inline(plan_doc: &str, script: Option<&str>, policy: MismatchPolicy) -> String {
    let mut out = Vec::new();
    commands::inline(plan_doc, script, policy, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run_declare(plan_doc: &str, script: Option<&str>) -> String {
    let mut out = Vec::new();
    commands::declare(plan_doc, script, MismatchPolicy::Truncate, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_inline_substitutes_compiled_value() {
    let out = run_inline(&one_param_plan(), None, MismatchPolicy::Truncate);
    assert_eq!(out, "SELECT * FROM T WHERE id = 42\n");
}

#[test]
fn test_declare_prints_declaration_then_unmodified_sql() {
    let out = run_declare(&one_param_plan(), None);
    assert_eq!(out, "DECLARE @id AS int = 42\nSELECT * FROM T WHERE id = @id\n");
}

#[test]
fn test_truncation_with_short_script() {
    // Two plan statements, one script statement: one pair prints.
    let doc = plan(
        r#"<StmtSimple StatementText="SELECT 1 FROM a WHERE x = @x">
  <QueryPlan><ParameterList>
    <ColumnReference Column="@x" ParameterDataType="int" ParameterCompiledValue="7"/>
  </ParameterList></QueryPlan>
</StmtSimple>
<StmtSimple StatementText="SELECT 2 FROM b WHERE y = @y">
  <QueryPlan><ParameterList>
    <ColumnReference Column="@y" ParameterDataType="int" ParameterCompiledValue="8"/>
  </ParameterList></QueryPlan>
</StmtSimple>"#,
    );
    let out = run_inline(&doc, Some("SELECT 1 FROM a WHERE x = @x"), MismatchPolicy::Truncate);
    assert_eq!(out, "SELECT 1 FROM a WHERE x = 7\n");
}

#[test]
fn test_script_text_wins_over_embedded_text() {
    // The script spells the statement differently; its text is used.
    let out = run_inline(
        &one_param_plan(),
        Some("select * from T  where id = @id"),
        MismatchPolicy::Truncate,
    );
    assert_eq!(out, "SELECT * FROM T WHERE id = 42\n");
}

#[test]
fn test_statement_without_text_is_skipped() {
    let doc = plan(r#"<StmtSimple StatementType="COND"/>"#);
    assert_eq!(run_inline(&doc, None, MismatchPolicy::Truncate), "");
    assert_eq!(run_declare(&doc, None), "");
}

#[test]
fn test_unmatched_parameter_is_noop() {
    // The map names a parameter the statement never uses.
    let doc = plan(
        r#"<StmtSimple StatementText="SELECT a FROM t">
  <QueryPlan><ParameterList>
    <ColumnReference Column="@unused" ParameterDataType="int" ParameterCompiledValue="9"/>
  </ParameterList></QueryPlan>
</StmtSimple>"#,
    );
    assert_eq!(run_inline(&doc, None, MismatchPolicy::Truncate), "SELECT a FROM t\n");
}

#[test]
fn test_mismatch_error_policy_aborts() {
    let mut out = Vec::new();
    let err = commands::inline(
        &one_param_plan(),
        Some("SELECT 1; SELECT 2"),
        MismatchPolicy::Error,
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().contains("refusing to correlate"));
}

#[test]
fn test_dump_prints_tree_structure() {
    let mut out = Vec::new();
    commands::dump("SELECT 1", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Statement\n"));
    assert!(text.contains("Keyword \"SELECT\""));
    assert!(text.contains("Literal \"1\""));
}

#[test]
fn test_utf16_plan_file_roundtrip() {
    use std::io::Write;

    let doc = one_param_plan();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in doc.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    let decoded = input::read_text(file.path()).unwrap();
    assert_eq!(decoded, doc);
    assert_eq!(
        run_inline(&decoded, None, MismatchPolicy::Truncate),
        "SELECT * FROM T WHERE id = 42\n"
    );
}
