use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type TranspileResult<T> = Result<T, TranspileError>;

#[derive(Error, Debug)]
pub enum TranspileError {
    #[error("Usage: cpc <filename.cpl> [options]")]
    MissingSource,

    #[error("A .cpl file is required, got {}", .0.display())]
    WrongExtension(PathBuf),

    #[error("File not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to find system C toolchain")]
    ToolchainNotFound,

    #[error("Failed to compile C code:\n{}", String::from_utf8_lossy(.0))]
    CCompileError(Vec<u8>),

    #[error("Failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Program was killed{}", .0.map(|sig| format!(" by signal {sig}")).unwrap_or_default())]
    ProgramKilled(Option<i32>),

    #[error("Program was interrupted")]
    Interrupted,
}

/// Coarse classification deciding how far an error is allowed to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad invocation; nothing has been done yet.
    Usage,
    /// Translation could not be read or written.
    Io,
    /// Compiler or program failure; only the remaining steps are skipped.
    Toolchain,
    /// The user cancelled the run.
    Interrupt,
}

impl TranspileError {
    pub const fn class(&self) -> ErrorClass {
        match self {
            TranspileError::MissingSource
            | TranspileError::WrongExtension(_)
            | TranspileError::SourceNotFound(_) => ErrorClass::Usage,
            TranspileError::Read { .. } | TranspileError::Write { .. } => ErrorClass::Io,
            TranspileError::ToolchainNotFound
            | TranspileError::CCompileError(_)
            | TranspileError::Launch { .. }
            | TranspileError::ProgramKilled(_) => ErrorClass::Toolchain,
            TranspileError::Interrupted => ErrorClass::Interrupt,
        }
    }
}

/// A construct whose tokens did not have the expected shape. The line it came
/// from is emitted unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteWarning {
    #[error("malformed `{keyword}` statement: {reason}")]
    Malformed {
        keyword: &'static str,
        reason: String,
    },

    #[error("unknown type `{0}` in declaration")]
    UnknownType(String),

    #[error("unknown modifier `{0}` in declaration")]
    UnknownModifier(String),

    #[error("return type `{0}` is not numeric, falling back to `int`")]
    NonNumericReturn(String),
}

/// Helper macro to create a `RewriteWarning::Malformed`
#[macro_export]
macro_rules! malformed {
    ( $keyword:literal, $($arg:tt)* ) => {
        $crate::error::RewriteWarning::Malformed {
            keyword: $keyword,
            reason: format!($($arg)*),
        }
    };
}
