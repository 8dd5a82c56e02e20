use std::process::ExitCode;

use clap::Parser;
use grayconv::cli::{self, CliArgs};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    cli::init_logging(args.verbose);
    cli::run(&args)
}
