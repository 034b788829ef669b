//! Correlation and substitution core.
//!
//! Control flow: the plan reader feeds the [`Correlator`], whose
//! pairs go through [`substitute`] (`inline` mode) or
//! [`declarations`] (`declare` mode) before rendering. Each pair is
//! processed independently; nothing is shared or cached across
//! statements.

pub mod correlate;
pub mod declare;
pub mod substitute;

pub use correlate::{Correlator, MismatchPolicy, Script};
pub use declare::declarations;
pub use substitute::substitute;
