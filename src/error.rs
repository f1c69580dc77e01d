//! Fatal errors of a hookdoc run and their exit codes

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookdocError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to load configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("The input directory {0:?} is not a directory")]
    InputNotDirectory(PathBuf),

    #[error("The output file {0:?} is not writable")]
    OutputNotWritable(PathBuf),

    #[error("The directory of the output file {0:?} does not exist")]
    OutputDirMissing(PathBuf),

    #[error("Failed to write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan {path:?}: {cause:#}")]
    ScanFailed { path: PathBuf, cause: anyhow::Error },
}

impl HookdocError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HookdocError::Usage(_) | HookdocError::Config(_) => 1,
            HookdocError::InputNotDirectory(_) => 2,
            HookdocError::OutputNotWritable(_) => 3,
            HookdocError::OutputDirMissing(_) => 4,
            HookdocError::WriteFailed { .. } => 5,
            HookdocError::ScanFailed { .. } => 6,
        }
    }
}
