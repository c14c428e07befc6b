//! CLI error handling with user-friendly messages.

use std::fmt;
use std::path::PathBuf;
use std::process;

use img2dds::BuildError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Loading, building or inspecting failed.
    Build(BuildError),
    /// The output path could not be derived from the input path.
    MissingExtension(PathBuf),
}

impl CliError {
    /// Exit the process with an error message and a non-zero code.
    pub fn exit(&self) -> ! {
        eprintln!("img2dds: {}", self);
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Build(e) => write!(f, "{}", e),
            CliError::MissingExtension(path) => write!(
                f,
                "cannot derive an output name from '{}': no file extension",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Build(e) => Some(e),
            CliError::MissingExtension(_) => None,
        }
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        CliError::Build(e)
    }
}
