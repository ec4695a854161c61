//! csvlite-cli: argument parsing, input discovery and the run summary.

pub mod args;
pub mod discovery;
pub mod run;

pub use args::Cli;
pub use run::run;
