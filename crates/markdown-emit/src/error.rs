use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Read = 1,
    // 2 is clap's usage error.
    Path = 3,
    CreateDirectory = 4,
    Write = 5,
}

impl ExitCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::Read),
            3 => Some(Self::Path),
            4 => Some(Self::CreateDirectory),
            5 => Some(Self::Write),
            _ => None,
        }
    }
}

/// Root cause classification of a failed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Read,
    Path,
    CreateDirectory,
    Write,
}

/// Failure while materialising a single annotated block.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("annotated path has no directory component: {path:?}")]
    Path { path: String },

    #[error("failed to create directory {dir:?}")]
    CreateDirectory {
        dir: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write file {path:?}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Path { .. } => ErrorKind::Path,
            Self::CreateDirectory { .. } => ErrorKind::CreateDirectory,
            Self::Write { .. } => ErrorKind::Write,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk through AST")]
    Walk(#[source] EmitError),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } => ErrorKind::Read,
            Self::Walk(inner) => inner.kind(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.kind() {
            ErrorKind::Read => ExitCode::Read,
            ErrorKind::Path => ExitCode::Path,
            ErrorKind::CreateDirectory => ExitCode::CreateDirectory,
            ErrorKind::Write => ExitCode::Write,
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
