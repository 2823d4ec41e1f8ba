//! Exit codes for the CLI tool.

use zipfnr::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive format error
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// A selected member is not UTF-8 text
pub const DECODE_ERROR: i32 = 6;
/// Two members would be renamed to the same name
pub const NAME_COLLISION: i32 = 7;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)] // UserInterrupt is exited directly from the signal handler
pub enum ExitCode {
    Success,
    FatalError,
    BadArchive,
    IoError,
    DecodeError,
    NameCollision,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::IoError => IO_ERROR,
            Self::DecodeError => DECODE_ERROR,
            Self::NameCollision => NAME_COLLISION,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a zipfnr error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::SourceNotFound { .. } => ExitCode::IoError,
        Error::InvalidArchive(_) => ExitCode::BadArchive,
        Error::Member { .. } => ExitCode::BadArchive,
        Error::NameCollision { .. } => ExitCode::NameCollision,
        Error::Cancelled => ExitCode::UserInterrupt,
        Error::EmptyPattern => ExitCode::BadArgs,
        Error::BackupExists { .. } => ExitCode::FatalError,
        Error::BackupFailed { .. } => ExitCode::IoError,
        Error::BackupMismatch { .. } => ExitCode::IoError,
        Error::MemberDecode { .. } => ExitCode::DecodeError,
        Error::Finalize { .. } => ExitCode::IoError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
