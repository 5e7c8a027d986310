//! Move ELF sections from the uncached ADSP SRAM alias to the cached one
//!
//! The rimage signing tool requires contiguous regions and does not know
//! that 0x80000000-0x9fffffff and 0xa0000000-0xbfffffff are the same memory.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hosttools::AliasWindow;
use hosttools::RelocateOptions;
use hosttools::elf;

#[derive(Parser, Debug)]
#[command(version, about = "Shift uncached ELF sections to their cached alias")]
struct Cli {
    /// objcopy binary supporting --change-section-address
    objcopy: PathBuf,

    /// ELF file to rewrite in place
    elf: PathBuf,

    /// Keep going when an objcopy invocation fails
    #[arg(long)]
    keep_going: bool,

    /// Print the commands without running them
    #[arg(long)]
    dry_run: bool,

    /// Base of the uncached window
    #[arg(long, value_parser = parse_hex, default_value = "0x80000000")]
    uncached_base: u64,

    /// Size of the uncached window, also the distance to the cached alias
    #[arg(long, value_parser = parse_hex, default_value = "0x20000000")]
    window_size: u64,
}

fn parse_hex(value: &str) -> Result<u64, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex value {:?}: {}", value, e))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut options = RelocateOptions::new(cli.objcopy, cli.elf);
    options.keep_going = cli.keep_going;
    options.dry_run = cli.dry_run;
    options.window = AliasWindow {
        base: cli.uncached_base,
        size: cli.window_size,
        cached_offset: cli.window_size,
    };

    match elf::relocate(&mut elf::SystemRunner, &options, &mut io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("relocator: {}", e);
            ExitCode::FAILURE
        }
    }
}
