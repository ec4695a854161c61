//! `csvlite paths... dbname`

use std::process::ExitCode;

use clap::Parser;
use csvlite_cli::{run, Cli};
use csvlite_core::errors::{ErrorCode, ImportError};

fn main() -> ExitCode {
    csvlite_core::tracing::init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) => {
            for error in &summary.report.errors {
                eprintln!("Could not load {}: {error}", error.source_id());
            }
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            match error.downcast_ref::<ImportError>() {
                Some(import) => eprintln!("error: {}", import.coded_string()),
                None => eprintln!("error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
