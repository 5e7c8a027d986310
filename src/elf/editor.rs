//! Moving uncached sections to their cached alias with an external objcopy
//!
//! Each edit re-opens and rewrites the whole ELF file, so commands run one at
//! a time in section-table order.

use std::fmt;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;

use crate::error::RelocateError;

use super::reader::read_sections;
use super::types::AliasWindow;
use super::types::SectionDescriptor;
use super::types::select_uncached;

/// Prefix for the per-section diagnostic lines
const DIAGNOSTIC_PREFIX: &str = "relocator";

/// One `--change-section-address` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCommand {
    pub tool: PathBuf,
    pub section: String,
    pub offset: u64,
    pub elf: PathBuf,
}

impl ShiftCommand {
    pub fn new(tool: &Path, section: &str, offset: u64, elf: &Path) -> Self {
        Self {
            tool: tool.to_path_buf(),
            section: section.to_string(),
            offset,
            elf: elf.to_path_buf(),
        }
    }

    /// The `<name>+<hex offset>` argument understood by objcopy
    pub fn change_argument(&self) -> String {
        format!("{}+{:#x}", self.section, self.offset)
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.tool);
        command
            .arg("--change-section-address")
            .arg(self.change_argument())
            .arg(&self.elf);
        command
    }
}

impl fmt::Display for ShiftCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --change-section-address {} {}",
            self.tool.display(),
            self.change_argument(),
            self.elf.display()
        )
    }
}

/// Runs shift commands to completion
pub trait CommandRunner {
    fn run(&mut self, command: &ShiftCommand) -> io::Result<ExitStatus>;
}

/// Spawns the real tool and waits for it
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ShiftCommand) -> io::Result<ExitStatus> {
        command.to_command().status()
    }
}

/// Inputs for a relocation run
#[derive(Debug, Clone)]
pub struct RelocateOptions {
    /// objcopy or a compatible tool
    pub tool: PathBuf,
    /// ELF file edited in place
    pub elf: PathBuf,
    pub window: AliasWindow,
    /// Log failed edits and continue instead of aborting
    pub keep_going: bool,
    /// Print commands without running them
    pub dry_run: bool,
}

impl RelocateOptions {
    pub fn new(tool: impl Into<PathBuf>, elf: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            elf: elf.into(),
            window: AliasWindow::ADSP,
            keep_going: false,
            dry_run: false,
        }
    }
}

/// Outcome of a relocation run
#[derive(Debug, Default)]
pub struct RelocationReport {
    /// Commands issued (or printed, for a dry run), in order
    pub commands: Vec<ShiftCommand>,
    /// Sections whose edit exited non-zero under `keep_going`
    pub failed: Vec<String>,
}

impl RelocationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Build the shift commands for the sections inside the window
pub fn plan(sections: &[SectionDescriptor], options: &RelocateOptions) -> Vec<ShiftCommand> {
    select_uncached(sections, &options.window)
        .iter()
        .map(|section| {
            log::debug!(
                "{}: {:#x} -> {:#x}",
                section.name,
                section.address,
                options.window.cached_address(section.address)
            );
            ShiftCommand::new(
                &options.tool,
                &section.name,
                options.window.cached_offset,
                &options.elf,
            )
        })
        .collect()
}

/// Read `options.elf` and move every uncached section to its cached alias
pub fn relocate<R: CommandRunner, W: Write>(
    runner: &mut R,
    options: &RelocateOptions,
    out: &mut W,
) -> Result<RelocationReport, RelocateError> {
    let sections = read_sections(&options.elf)?;
    relocate_sections(runner, &sections, options, out)
}

/// Relocation over an already-read section list
pub fn relocate_sections<R: CommandRunner, W: Write>(
    runner: &mut R,
    sections: &[SectionDescriptor],
    options: &RelocateOptions,
    out: &mut W,
) -> Result<RelocationReport, RelocateError> {
    let commands = plan(sections, options);

    for command in &commands {
        writeln!(
            out,
            "{}: Moving section {} to cached SRAM region",
            DIAGNOSTIC_PREFIX, command.section
        )?;
    }

    let mut report = RelocationReport::default();
    for command in commands {
        writeln!(out, "{}", command)?;
        out.flush()?;

        if !options.dry_run {
            let status = runner.run(&command).map_err(|source| RelocateError::Spawn {
                tool: command.tool.clone(),
                source,
            })?;

            if !status.success() {
                if !options.keep_going {
                    return Err(RelocateError::ToolFailed {
                        section: command.section,
                        status,
                    });
                }
                log::warn!("moving section {} failed: {}", command.section, status);
                report.failed.push(command.section.clone());
            }
        }

        report.commands.push(command);
    }

    log::info!(
        "{} section(s) relocated in {}, {} failed",
        report.commands.len() - report.failed.len(),
        options.elf.display(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::os::unix::process::ExitStatusExt;

    use super::*;
    use crate::elf::CACHED_ALIAS_OFFSET;

    /// Records every command and answers with scripted exit codes
    #[derive(Default)]
    struct RecordingRunner {
        seen: Vec<ShiftCommand>,
        failing: Vec<String>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, command: &ShiftCommand) -> io::Result<ExitStatus> {
            self.seen.push(command.clone());
            let code = if self.failing.contains(&command.section) { 1 } else { 0 };
            Ok(ExitStatus::from_raw(code << 8))
        }
    }

    struct BrokenRunner;

    impl CommandRunner for BrokenRunner {
        fn run(&mut self, _command: &ShiftCommand) -> io::Result<ExitStatus> {
            Err(io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn options() -> RelocateOptions {
        RelocateOptions::new("xtensa-objcopy", "zephyr.elf")
    }

    fn sample_sections() -> Vec<SectionDescriptor> {
        vec![
            SectionDescriptor::new("", 0),
            SectionDescriptor::new(".bss", 0x8000_0000),
            SectionDescriptor::new(".data", 0xa000_0000),
            SectionDescriptor::new(".text", 0x9000_1000),
        ]
    }

    #[test]
    fn test_command_line() {
        let command = ShiftCommand::new(
            Path::new("/opt/bin/objcopy"),
            ".noinit",
            CACHED_ALIAS_OFFSET,
            Path::new("build/zephyr.elf"),
        );
        assert_eq!(
            command.to_string(),
            "/opt/bin/objcopy --change-section-address .noinit+0x20000000 build/zephyr.elf"
        );

        let built = command.to_command();
        let args: Vec<&str> = built.get_args().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, vec!["--change-section-address", ".noinit+0x20000000", "build/zephyr.elf"]);
    }

    #[test]
    fn test_shift_lands_in_cached_alias() {
        let opts = options();
        let commands = plan(&[SectionDescriptor::new(".text", 0x9000_1000)], &opts);
        assert_eq!(commands.len(), 1);
        assert_eq!(0x9000_1000 + commands[0].offset, 0xb000_1000);
        assert_eq!(
            opts.window.cached_address(0x9000_1000),
            0x9000_1000 + commands[0].offset
        );
    }

    #[test]
    fn test_relocate_in_discovery_order() {
        let mut runner = RecordingRunner::default();
        let mut out = Vec::new();
        let report = relocate_sections(&mut runner, &sample_sections(), &options(), &mut out).unwrap();

        let sections: Vec<&str> = runner.seen.iter().map(|c| c.section.as_str()).collect();
        assert_eq!(sections, vec![".bss", ".text"]);
        assert!(report.is_clean());

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "relocator: Moving section .bss to cached SRAM region",
                "relocator: Moving section .text to cached SRAM region",
                "xtensa-objcopy --change-section-address .bss+0x20000000 zephyr.elf",
                "xtensa-objcopy --change-section-address .text+0x20000000 zephyr.elf",
            ]
        );
    }

    #[test]
    fn test_nothing_to_move() {
        let mut runner = RecordingRunner::default();
        let mut out = Vec::new();
        let sections = vec![
            SectionDescriptor::new(".text", 0x7fff_ffff),
            SectionDescriptor::new(".data", 0xa000_0001),
        ];
        let report = relocate_sections(&mut runner, &sections, &options(), &mut out).unwrap();

        assert!(runner.seen.is_empty());
        assert!(report.commands.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_tool_failure_aborts() {
        let mut runner = RecordingRunner {
            failing: vec![".bss".to_string()],
            ..Default::default()
        };
        let mut out = Vec::new();
        let err = relocate_sections(&mut runner, &sample_sections(), &options(), &mut out).unwrap_err();

        assert!(matches!(err, RelocateError::ToolFailed { ref section, .. } if section == ".bss"));
        assert_eq!(runner.seen.len(), 1);
    }

    #[test]
    fn test_keep_going_tolerates_failures() {
        let mut runner = RecordingRunner {
            failing: vec![".bss".to_string()],
            ..Default::default()
        };
        let mut opts = options();
        opts.keep_going = true;
        let mut out = Vec::new();
        let report = relocate_sections(&mut runner, &sample_sections(), &opts, &mut out).unwrap();

        assert_eq!(runner.seen.len(), 2);
        assert_eq!(report.failed, vec![".bss".to_string()]);
        assert_eq!(report.commands.len(), 2);
    }

    #[test]
    fn test_dry_run_prints_only() {
        let mut runner = RecordingRunner::default();
        let mut opts = options();
        opts.dry_run = true;
        let mut out = Vec::new();
        let report = relocate_sections(&mut runner, &sample_sections(), &opts, &mut out).unwrap();

        assert!(runner.seen.is_empty());
        assert_eq!(report.commands.len(), 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_spawn_failure_is_fatal_even_with_keep_going() {
        let mut opts = options();
        opts.keep_going = true;
        let mut out = Vec::new();
        let err = relocate_sections(&mut BrokenRunner, &sample_sections(), &opts, &mut out).unwrap_err();
        assert!(matches!(err, RelocateError::Spawn { .. }));
    }
}
