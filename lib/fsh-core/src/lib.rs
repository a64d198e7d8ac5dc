//! Core of the `fsh` file explorer shell.
//!
//! A [`Session`] holds the current directory. Every file operation is a
//! method on it that takes already-tokenized string arguments and returns
//! a [`Result`] whose error carries a human readable reason.

#![deny(
    dead_code,
    nonstandard_style,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

mod error;
pub mod metadata;
mod ops;
pub mod path;
pub mod search;
mod session;
pub mod users;

pub use crate::error::{FsError, Result};
pub use crate::metadata::{DirectoryEntry, FileType, human_size, permission_string};
pub use crate::ops::Listing;
pub use crate::session::Session;
