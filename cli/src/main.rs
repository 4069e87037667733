mod args;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::args::{Args, Command};
use crate::logging::LogWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let writer = LogWriter::new(args.log.clone()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });
    logging::init(&args.log_level, writer);

    let conninfo = match args.resolve_conninfo() {
        Ok(conninfo) => conninfo,
        Err(err) => {
            tracing::error!(error = %err, "cannot determine connection string");
            return ExitCode::from(commands::EXIT_USAGE);
        }
    };

    let outcome = match &args.command {
        Command::Parse => commands::parse(&conninfo),
        Command::DetectorResults {
            start_run,
            end_run,
            detector,
        } => commands::detector_results(&conninfo, *start_run, *end_run, detector).await,
    };

    match outcome {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::from(commands::exit_code(&err))
        }
    }
}
