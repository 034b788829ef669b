//! Error types shared across the plansql workspace.
//!
//! Every fallible operation in the library crates returns
//! [`Result`], so the binary has a single error surface to report.

use thiserror::Error;

/// Workspace-wide error enum.
///
/// Plan reading fails fast: the first malformed element or missing
/// attribute aborts the run with no partial-output guarantee.
#[derive(Debug, Error)]
pub enum PlanSqlError {
    /// The plan input is not well-formed XML.
    #[error("malformed plan document: {0}")]
    Document(String),

    /// A `ColumnReference` element lacks one of its required attributes.
    #[error("plan element <{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: String,
    },

    /// Plan statement count and script statement count differ, and the
    /// correlation policy forbids it.
    #[error(
        "plan has {plan_statements} statement(s) but script has {script_statements}; \
         refusing to correlate"
    )]
    LengthMismatch {
        plan_statements: usize,
        script_statements: usize,
    },

    /// An input file is not decodable as UTF-8 or (for plan files)
    /// BOM-marked UTF-16.
    #[error("cannot decode {path}: {reason}")]
    Encoding { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlanSqlError>;
