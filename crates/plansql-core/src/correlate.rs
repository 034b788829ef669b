//! Statement correlation.
//!
//! Pairs the plan reader's parameter maps with SQL statements: either
//! the plan's own embedded statements (no script), or the statements
//! of an externally supplied script matched positionally, first with
//! first, second with second. No content matching or reordering ever
//! happens.
//!
//! What happens when the two sides disagree in length is an explicit
//! policy, not a library side effect of zipping two iterators.

use plansql_ast::TokenTree;
use plansql_error::{PlanSqlError, Result};
use plansql_plan::{ParameterMap, PlanStatement};
use tracing::warn;

/// Policy for a plan/script statement-count mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Stop at the shorter sequence, dropping the tail of the longer
    /// one. This mirrors the historical zip behavior.
    #[default]
    Truncate,
    /// Fail with [`PlanSqlError::LengthMismatch`].
    Error,
    /// Continue to the longer sequence: a missing script statement
    /// pairs as no statement, a missing parameter map pairs as empty.
    Pad,
}

/// An externally supplied script: parsed statements with
/// whitespace-only ones removed.
#[derive(Debug, Clone)]
pub struct Script {
    statements: Vec<TokenTree>,
}

impl Script {
    pub fn parse(sql: &str) -> Self {
        let statements = plansql_parser::parse(sql)
            .into_iter()
            .filter(|stmt| !stmt.is_whitespace_only())
            .collect();
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Dual-cursor iterator producing the pairs ready for substitution or
/// declaration emission.
pub struct Correlator<P> {
    plan: P,
    script: Option<std::vec::IntoIter<TokenTree>>,
    policy: MismatchPolicy,
    pairs_emitted: usize,
    done: bool,
}

impl<P> Correlator<P>
where
    P: Iterator<Item = Result<PlanStatement>>,
{
    pub fn new(plan: P, script: Option<Script>, policy: MismatchPolicy) -> Self {
        Self {
            plan,
            script: script.map(|s| s.statements.into_iter()),
            policy,
            pairs_emitted: 0,
            done: false,
        }
    }

    /// Count everything left on both cursors for the mismatch error.
    fn length_mismatch(&mut self, plan_extra: usize, script_extra: usize) -> PlanSqlError {
        let plan_rest = self.plan.by_ref().count();
        let script_rest = self.script.as_mut().map_or(0, |s| s.count());
        PlanSqlError::LengthMismatch {
            plan_statements: self.pairs_emitted + plan_extra + plan_rest,
            script_statements: self.pairs_emitted + script_extra + script_rest,
        }
    }

    fn advance(&mut self) -> Option<Result<PlanStatement>> {
        let Some(script) = self.script.as_mut() else {
            // No script: the plan's own (possibly absent) statements
            // pass through unchanged.
            return self.plan.next();
        };
        match (self.plan.next(), script.next()) {
            (Some(Err(err)), _) => Some(Err(err)),
            (Some(Ok(plan_stmt)), Some(statement)) => Some(Ok(PlanStatement {
                sql: Some(statement),
                params: plan_stmt.params,
            })),
            (None, None) => None,
            (Some(Ok(plan_stmt)), None) => match self.policy {
                MismatchPolicy::Truncate => {
                    warn!(
                        pairs = self.pairs_emitted,
                        "script exhausted before plan; dropping trailing plan parameter maps"
                    );
                    None
                }
                MismatchPolicy::Error => Some(Err(self.length_mismatch(1, 0))),
                MismatchPolicy::Pad => Some(Ok(PlanStatement {
                    sql: None,
                    params: plan_stmt.params,
                })),
            },
            (None, Some(statement)) => match self.policy {
                MismatchPolicy::Truncate => {
                    warn!(
                        pairs = self.pairs_emitted,
                        "plan exhausted before script; dropping trailing script statements"
                    );
                    None
                }
                MismatchPolicy::Error => Some(Err(self.length_mismatch(0, 1))),
                MismatchPolicy::Pad => Some(Ok(PlanStatement {
                    sql: Some(statement),
                    params: ParameterMap::new(),
                })),
            },
        }
    }
}

impl<P> Iterator for Correlator<P>
where
    P: Iterator<Item = Result<PlanStatement>>,
{
    type Item = Result<PlanStatement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Some(Ok(pair)) => {
                self.pairs_emitted += 1;
                Some(Ok(pair))
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}
