//! Command-line front end for `reactive-ta`.
//!
//! Exposes the CLI components for testing and reuse: argument parsing, quote
//! file loading, CSV output and the command runner.

pub mod args;
pub mod csv_parser;
pub mod csv_writer;
pub mod error;
pub mod run;

pub use error::{CliError, Result};
pub use run::run;
