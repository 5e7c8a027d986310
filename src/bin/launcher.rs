//! Run a program with SCHED_FIFO realtime scheduling when permitted
//!
//! Usage: launcher <target-executable> [args...]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use clap::Parser;

use hosttools::LaunchRequest;
use hosttools::launch;

#[derive(Parser, Debug)]
#[command(version, about = "Exec a program with best-effort SCHED_FIFO scheduling")]
struct Cli {
    /// Target executable followed by its arguments, passed through verbatim
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    command: Vec<OsString>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = LaunchRequest::new(cli.command)
        .and_then(|request| launch::launch(&mut launch::System, &request, &mut io::stdout()));

    // Only reachable when the exec did not happen
    match result {
        Ok(never) => match never {},
        Err(e) => {
            eprintln!("launcher: {}", e);
            ExitCode::FAILURE
        }
    }
}
