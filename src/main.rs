use std::process::ExitCode;

use http_bench::error::{AppError, ValidationError};

fn main() -> ExitCode {
    match http_bench::entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        // clap has already printed the usage text.
        Err(AppError::Validation(ValidationError::Usage { .. })) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
