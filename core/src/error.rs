use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Part of the engine contract that was running when the engine gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Integrator,
    Context,
    Minimize,
    Step,
    State,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Build => "build",
            Stage::Integrator => "integrator",
            Stage::Context => "context",
            Stage::Minimize => "minimize",
            Stage::Step => "step",
            Stage::State => "state",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file '{}' not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("malformed file '{}' (line {line}): {details}", .path.display())]
    FileFormat {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("engine failed during {stage}: {message}")]
    Engine { stage: Stage, message: String },

    #[error("reporter failed at step {step}: {source}")]
    Report {
        step: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("can't open report output '{}': {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    pub fn file_format(path: &Path, line: usize, details: impl Into<String>) -> Self {
        Error::FileFormat {
            path: path.to_path_buf(),
            line,
            details: details.into(),
        }
    }

    pub fn sink(path: &Path, source: std::io::Error) -> Self {
        Error::Sink {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn configuration(details: impl Into<String>) -> Self {
        Error::Configuration(details.into())
    }

    /// Name of the pipeline stage the error belongs to, used in diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::FileNotFound { .. } | Error::FileFormat { .. } => "load",
            Error::Configuration(_) => "configure",
            Error::Engine { stage, .. } => match stage {
                Stage::Build | Stage::Integrator | Stage::Context => "build",
                Stage::Minimize => "minimize",
                Stage::Step | Stage::State => "step",
            },
            Error::Report { .. } | Error::Sink { .. } => "report",
            Error::Io { .. } => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
