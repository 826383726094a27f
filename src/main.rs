use std::process::ExitCode;

use clap::Parser;
use diff_annotations::{
    cli::{Arguments, FATAL_ERROR, run_cli},
    logger,
};

fn main() -> ExitCode {
    let args = Arguments::parse();
    logger::init(args.log_level());

    match run_cli(&args) {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(FATAL_ERROR)
        }
    }
}
