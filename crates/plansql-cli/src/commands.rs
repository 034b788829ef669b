//! The three output modes: inline, declare, dump.
//!
//! Each takes decoded input text and a writer, so the binary and the
//! tests share one code path. Statements absent from the pairing (no
//! captured text, no script) are skipped; their parameter maps print
//! nothing in either mode.

use std::io::Write;

use plansql_core::{Correlator, MismatchPolicy, Script, declarations, substitute};
use plansql_error::Result;
use plansql_format::{FormatOptions, format};
use plansql_plan::PlanReader;
use tracing::debug;

fn correlated<'a>(
    plan_doc: &'a str,
    script: Option<&str>,
    policy: MismatchPolicy,
) -> Correlator<PlanReader<'a>> {
    let reader = PlanReader::new(plan_doc);
    let script = script.map(Script::parse);
    if let Some(s) = &script {
        debug!(script_statements = s.len(), "correlating against external script");
    }
    Correlator::new(reader, script, policy)
}

/// `inline`: substitute compiled values into each statement and print
/// the normalized text.
pub fn inline(
    plan_doc: &str,
    script: Option<&str>,
    policy: MismatchPolicy,
    out: &mut impl Write,
) -> Result<()> {
    let options = FormatOptions::default();
    for pair in correlated(plan_doc, script, policy) {
        let pair = pair?;
        let Some(tree) = pair.sql else { continue };
        let substituted = substitute(&tree, &pair.params);
        writeln!(out, "{}", format(&substituted, &options))?;
    }
    Ok(())
}

/// `declare`: print one DECLARE line per parameter, then the
/// statement text unmodified.
pub fn declare(
    plan_doc: &str,
    script: Option<&str>,
    policy: MismatchPolicy,
    out: &mut impl Write,
) -> Result<()> {
    let options = FormatOptions::default();
    for pair in correlated(plan_doc, script, policy) {
        let pair = pair?;
        let Some(tree) = pair.sql else { continue };
        for line in declarations(&pair.params) {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{}", format(&tree, &options))?;
    }
    Ok(())
}

/// `dump`: print the token-tree structure of every statement in a
/// script, for debugging the tokenizer boundary.
pub fn dump(script_text: &str, out: &mut impl Write) -> Result<()> {
    for statement in plansql_parser::parse(script_text) {
        write!(out, "{}", plansql_format::dump(&statement))?;
    }
    Ok(())
}
