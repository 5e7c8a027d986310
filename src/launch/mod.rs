//! Launching a process under realtime scheduling

mod types;
mod launcher;

pub use launcher::ProcessControl;
pub use launcher::REALTIME_WARNING;
pub use launcher::System;
pub use launcher::launch;
pub use types::LaunchRequest;
