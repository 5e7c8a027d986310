//! hosttools: host-side helpers for running and packaging ADSP firmware
//!
//! Two independent tools live here:
//!
//! - [`launch`]: re-exec a program (typically QEMU) with SCHED_FIFO
//!   scheduling applied when the process is allowed to have it.
//! - [`elf`]: move ELF sections linked into the uncached SRAM alias over to
//!   the cached alias, using an external objcopy.
//!
//! # Example
//!
//! ```no_run
//! use hosttools::elf::RelocateOptions;
//! use hosttools::elf::SystemRunner;
//!
//! let options = RelocateOptions::new("xtensa-objcopy", "zephyr.elf");
//! let report = hosttools::elf::relocate(&mut SystemRunner, &options, &mut std::io::stdout()).unwrap();
//! println!("{} section(s) moved", report.commands.len());
//! ```

pub mod elf;
pub mod error;
pub mod launch;

pub use elf::AliasWindow;
pub use elf::RelocateOptions;
pub use elf::SectionDescriptor;
pub use error::LaunchError;
pub use error::RelocateError;
pub use launch::LaunchRequest;
