use std::fs;

use tracing::{debug, warn};

use crate::{FsError, Result, path};

/// State of one interactive session: the current working directory.
///
/// The directory is held as an absolute string and is only replaced by a
/// successful [`Session::change_directory`]. It is not re-validated before
/// other operations, so it may point at a directory that was removed in the
/// meantime; operations then fail with the error of the underlying call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    current_path: String,
}

impl Session {
    /// Start in the process working directory, or in `/` if it can't be
    /// determined.
    pub fn from_current_dir() -> Self {
        let current_path = match std::env::current_dir() {
            Ok(dir) => match dir.into_os_string().into_string() {
                Ok(dir) => dir,
                Err(dir) => {
                    warn!(?dir, "working directory is not valid UTF-8, starting in /");
                    "/".to_string()
                }
            },
            Err(error) => {
                warn!(%error, "unable to determine the working directory, starting in /");
                "/".to_string()
            }
        };

        Session { current_path }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Navigate to `token` (`..`, an absolute path or a relative path).
    ///
    /// The current directory is left untouched unless the target exists and
    /// is a directory.
    #[tracing::instrument(level = "debug", skip(self), fields(from = %self.current_path))]
    pub fn change_directory(&mut self, token: &str) -> Result<()> {
        let target = path::resolve(&self.current_path, token);

        let metadata = fs::metadata(&target).map_err(|error| {
            debug!(%target, %error, "cannot stat navigation target");
            FsError::from(error)
        })?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory);
        }

        self.current_path = target;
        Ok(())
    }
}
