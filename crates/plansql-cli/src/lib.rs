//! Command implementations behind the `plansql` binary.
//!
//! The binary itself only parses arguments and routes; everything
//! observable lives here so it can be exercised directly in tests.

pub mod commands;
pub mod input;
