//! Launch request type

use std::ffi::OsStr;
use std::ffi::OsString;

use crate::error::LaunchError;

/// Target executable followed by its arguments
///
/// The full list becomes the new image's argv, so argument zero is the
/// target path itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    argv: Vec<OsString>,
}

impl LaunchRequest {
    pub fn new<I, S>(argv: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(LaunchError::EmptyRequest);
        }
        Ok(Self { argv })
    }

    /// Executable to run
    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    /// Arguments after argument zero
    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    /// Complete argument vector, argument zero included
    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }
}
