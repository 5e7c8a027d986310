//! Best-effort SCHED_FIFO followed by exec
//!
//! Raising the scheduling class needs CAP_SYS_NICE (or root). Without it the
//! target still runs, just with normal time-sharing priority.

use std::convert::Infallible;
use std::io;
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::process::Command;

use crate::error::LaunchError;

use super::types::LaunchRequest;

/// Printed to stdout when realtime scheduling cannot be enabled
pub const REALTIME_WARNING: &str = "Warning: could not set SCHED_FIFO realtime scheduling on this process.\n\
Tests on loaded machines may be unreliable without the CAP_SYS_NICE capability.";

/// The two process-level operations the launcher performs
pub trait ProcessControl {
    /// Switch the calling process to SCHED_FIFO at the highest static priority
    fn set_realtime_priority(&mut self) -> io::Result<()>;

    /// Replace the process image; returns only on failure
    fn replace_image(&mut self, request: &LaunchRequest) -> io::Error;
}

/// The running process
#[derive(Debug, Default)]
pub struct System;

impl ProcessControl for System {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn set_realtime_priority(&mut self) -> io::Result<()> {
        // SAFETY: no pointers involved
        let priority = unsafe { libc::sched_get_priority_max(libc::SCHED_FIFO) };
        if priority < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: sched_param is plain data; zero is a valid value for every field
        let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
        param.sched_priority = priority;

        // SAFETY: pid 0 is the calling process and param outlives the call
        let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }
        log::debug!("SCHED_FIFO enabled at priority {}", priority);
        Ok(())
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn set_realtime_priority(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "sched_setscheduler is not available on this platform",
        ))
    }

    fn replace_image(&mut self, request: &LaunchRequest) -> io::Error {
        Command::new(request.program())
            .arg0(request.program())
            .args(request.args())
            .exec()
    }
}

/// Whether a scheduler error means "not allowed here" rather than a real fault
///
/// Either way the target still runs; real faults are also logged as errors.
fn is_denial(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::Unsupported
    )
}

/// Try to go realtime, then exec the request
///
/// On success this never returns: the process becomes the target and no
/// code after the exec runs, including destructors. The exit code is the
/// target's.
pub fn launch<P: ProcessControl, W: Write>(
    control: &mut P,
    request: &LaunchRequest,
    out: &mut W,
) -> Result<Infallible, LaunchError> {
    match control.set_realtime_priority() {
        Ok(()) => {}
        Err(err) => {
            if is_denial(&err) {
                log::debug!("realtime scheduling denied: {}", err);
            } else {
                log::error!("failed to set realtime scheduling: {}", err);
            }
            let _ = writeln!(out, "{}", REALTIME_WARNING);
            let _ = out.flush();
        }
    }

    log::debug!("exec {:?}", request.argv());
    let source = control.replace_image(request);
    Err(LaunchError::Exec {
        program: request.program().to_os_string(),
        source,
    })
}
