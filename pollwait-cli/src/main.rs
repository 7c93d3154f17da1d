use std::process::ExitCode;

use clap::Parser;
use pollwait_cli::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    match pollwait_cli::run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
