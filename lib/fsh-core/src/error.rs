use std::io;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = FsError> = std::result::Result<T, E>;

/// Why a file operation failed.
///
/// The `Display` output is meant to be shown to the user as the reason
/// of a failed command.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FsError {
    /// The requested file or directory could not be found
    #[error("no such file or directory")]
    EntryNotFound,
    /// A directory was expected but something else was found
    #[error("not a directory")]
    NotADirectory,
    /// Expected a regular file but found something else
    #[error("not a regular file")]
    NotARegularFile,
    /// Caller was not allowed to perform this operation
    #[error("permission denied")]
    PermissionDenied,
    /// File exists
    #[error("file exists")]
    AlreadyExists,
    /// A directory was found where a file was expected
    #[error("is a directory")]
    IsADirectory,
    /// A directory with children can't be removed
    #[error("directory not empty")]
    DirectoryNotEmpty,
    /// An argument was rejected before touching the filesystem
    #[error("{0}")]
    InvalidArgument(String),
    /// A rename crossed a filesystem boundary
    #[error("cannot move across filesystems")]
    CrossDevice,
    /// Something failed when doing IO. These errors can generally not be handled.
    #[error("{0}")]
    IOError(String),
    /// An OS error with no dedicated variant, carrying the OS description.
    #[error("{0}")]
    UnknownError(String),
}

impl FsError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        FsError::InvalidArgument(reason.into())
    }
}

impl From<io::Error> for FsError {
    fn from(io_error: io::Error) -> Self {
        match io_error.kind() {
            io::ErrorKind::NotFound => FsError::EntryNotFound,
            io::ErrorKind::NotADirectory => FsError::NotADirectory,
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            io::ErrorKind::ReadOnlyFilesystem => FsError::PermissionDenied,
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists,
            io::ErrorKind::IsADirectory => FsError::IsADirectory,
            io::ErrorKind::DirectoryNotEmpty => FsError::DirectoryNotEmpty,
            io::ErrorKind::CrossesDevices => FsError::CrossDevice,
            io::ErrorKind::InvalidInput => FsError::InvalidArgument(describe(&io_error)),
            io::ErrorKind::Other => FsError::IOError(describe(&io_error)),
            _ => FsError::UnknownError(describe(&io_error)),
        }
    }
}

/// The OS description of `error` in the lowercase style of the other
/// variants, without the `(os error N)` suffix.
fn describe(error: &io::Error) -> String {
    let text = error.to_string();
    let text = match text.rsplit_once(" (os error ") {
        Some((message, _)) => message,
        None => text.as_str(),
    };

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
