//! The file operations a session exposes to the shell.
//!
//! Every operation resolves its arguments as bare names under the current
//! directory. Metadata is checked and then acted upon in two separate
//! calls, so a concurrent change to the filesystem between the two can make
//! an operation fail with the error of the second call.

use std::fs::{self, DirBuilder, File, Permissions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, MetadataExt, PermissionsExt};

use tracing::{debug, warn};

use crate::metadata::{DirectoryEntry, FileType};
use crate::{FsError, Result, Session, path, search, users};

const DIRECTORY_MODE: u32 = 0o755;

/// Contents of the current directory, as returned by [`Session::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Every entry with its metadata, in enumeration order.
    Detailed(Vec<DirectoryEntry>),
    /// Names only, directories and everything else in two sorted groups.
    Grouped {
        directories: Vec<String>,
        files: Vec<String>,
    },
}

impl Session {
    /// List the current directory.
    #[tracing::instrument(level = "debug", skip(self), fields(dir = %self.current_path()))]
    pub fn list(&self, detailed: bool) -> Result<Listing> {
        let entries = self.read_entries()?;

        if detailed {
            return Ok(Listing::Detailed(entries));
        }

        let (directories, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.file_type.is_dir());
        let mut directories: Vec<String> = directories.into_iter().map(|e| e.name).collect();
        let mut files: Vec<String> = files.into_iter().map(|e| e.name).collect();
        directories.sort();
        files.sort();

        Ok(Listing::Grouped { directories, files })
    }

    fn read_entries(&self) -> Result<Vec<DirectoryEntry>> {
        let read_dir = fs::read_dir(self.current_path())?;
        let mut entries = Vec::new();

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!(%error, "skipping unreadable directory entry");
                    continue;
                }
            };
            let full_path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            // Follow symlinks, but still show dangling ones as links.
            match fs::metadata(&full_path).or_else(|_| fs::symlink_metadata(&full_path)) {
                Ok(metadata) => entries.push(DirectoryEntry::from_metadata(name, &metadata)),
                Err(error) => {
                    debug!(path = %full_path.display(), %error, "skipping entry without metadata")
                }
            }
        }

        Ok(entries)
    }

    /// Create the directory `name` with mode `0755`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create_directory(&self, name: &str) -> Result<()> {
        let target = path::join(self.current_path(), name);

        DirBuilder::new()
            .mode(DIRECTORY_MODE)
            .create(&target)
            .map_err(Into::into)
    }

    /// Create an empty regular file, truncating it if it already exists.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create_file(&self, name: &str) -> Result<()> {
        let target = path::join(self.current_path(), name);

        File::create(&target)?;
        Ok(())
    }

    /// Remove a file, or a directory if it is empty.
    ///
    /// Returns the type of what was removed. Symlinks are removed
    /// themselves, never their target.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete_item(&self, name: &str) -> Result<FileType> {
        let target = path::join(self.current_path(), name);
        let file_type = FileType::from_mode(fs::symlink_metadata(&target)?.mode());

        if file_type.is_dir() {
            // rmdir reports a non-empty directory inconsistently across
            // platforms, so check for children first.
            if fs::read_dir(&target).is_ok_and(|mut children| children.next().is_some()) {
                return Err(FsError::DirectoryNotEmpty);
            }
            fs::remove_dir(&target).map_err(|error| match error.kind() {
                io::ErrorKind::AlreadyExists => FsError::DirectoryNotEmpty,
                _ => error.into(),
            })?;
        } else {
            fs::remove_file(&target)?;
        }

        Ok(file_type)
    }

    /// Copy the contents and mode bits of the regular file `src` to `dest`.
    ///
    /// Returns the number of bytes copied.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn copy(&self, src: &str, dest: &str) -> Result<u64> {
        let src_path = path::join(self.current_path(), src);
        let dest_path = path::join(self.current_path(), dest);

        let metadata = fs::metadata(&src_path)?;
        if !metadata.is_file() {
            return Err(FsError::NotARegularFile);
        }
        if let Ok(existing) = fs::metadata(&dest_path) {
            if existing.dev() == metadata.dev() && existing.ino() == metadata.ino() {
                return Err(FsError::invalid_argument(
                    "source and destination are the same file",
                ));
            }
        }

        let mut source = File::open(&src_path)?;
        let mut destination = File::create(&dest_path)?;
        let copied = io::copy(&mut source, &mut destination)?;

        if let Err(error) = destination.set_permissions(metadata.permissions()) {
            warn!(path = %dest_path, %error, "copied contents but could not copy the mode bits");
        }

        Ok(copied)
    }

    /// Rename `src` to `dest`, replacing `dest` if it exists.
    ///
    /// This is a single rename call, so it fails across filesystems.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn move_item(&self, src: &str, dest: &str) -> Result<()> {
        let src_path = path::join(self.current_path(), src);
        let dest_path = path::join(self.current_path(), dest);

        fs::rename(&src_path, &dest_path).map_err(Into::into)
    }

    /// Find every entry below the current directory whose name contains
    /// `pattern`. See [`search::search`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn search(&self, pattern: &str) -> Vec<String> {
        search::search(self.current_path(), pattern)
    }

    /// Set the permission bits of `name` from a three digit octal string
    /// such as `755`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn change_permissions(&self, name: &str, mode: &str) -> Result<()> {
        let mode = parse_mode(mode)?;
        let target = path::join(self.current_path(), name);

        fs::set_permissions(&target, Permissions::from_mode(mode)).map_err(Into::into)
    }

    /// Hand `name` over to the user called `owner`. The group is left
    /// unchanged.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn change_owner(&self, name: &str, owner: &str) -> Result<()> {
        let uid = users::lookup_uid(owner)
            .ok_or_else(|| FsError::invalid_argument(format!("user not found: {owner}")))?;
        let target = path::join(self.current_path(), name);

        std::os::unix::fs::chown(&target, Some(uid), None).map_err(Into::into)
    }
}

fn parse_mode(mode: &str) -> Result<u32> {
    let is_octal_triplet = mode.len() == 3 && mode.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if !is_octal_triplet {
        return Err(FsError::invalid_argument(
            "permission format should be octal (e.g., 755)",
        ));
    }

    u32::from_str_radix(mode, 8)
        .map_err(|_| FsError::invalid_argument("permission format should be octal (e.g., 755)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::session_in;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn mode_of(path: impl AsRef<std::path::Path>) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn grouped_listing_is_sorted_per_group() {
        let temp = TempDir::new().unwrap();
        for dir in ["zeta", "alpha"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }
        for file in ["b.txt", "a.txt", "C.txt"] {
            fs::write(temp.path().join(file), b"").unwrap();
        }
        let session = session_in(&temp);

        assert_eq!(
            session.list(false).unwrap(),
            Listing::Grouped {
                directories: vec!["alpha".to_string(), "zeta".to_string()],
                files: vec!["C.txt".to_string(), "a.txt".to_string(), "b.txt".to_string()],
            }
        );
    }

    #[test]
    fn detailed_listing_carries_metadata() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("data.bin"), vec![7u8; 2048]).unwrap();
        fs::set_permissions(temp.path().join("data.bin"), Permissions::from_mode(0o640)).unwrap();
        let session = session_in(&temp);

        let Listing::Detailed(mut entries) = session.list(true).unwrap() else {
            panic!("expected a detailed listing");
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "data.bin");
        assert_eq!(entries[0].file_type, FileType::File);
        assert_eq!(entries[0].permissions(), "rw-r-----");
        assert_eq!(entries[0].human_size(), "2.00 KB");
        assert!(!entries[0].is_executable());
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].file_type, FileType::Dir);
    }

    #[test]
    fn dangling_symlinks_are_listed_as_links() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("broken"))
            .unwrap();
        let session = session_in(&temp);

        let Listing::Detailed(entries) = session.list(true).unwrap() else {
            panic!("expected a detailed listing");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_type, FileType::Link);
    }

    #[test]
    fn non_utf8_names_are_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(OsStr::from_bytes(b"caf\xe9"))).unwrap();
        fs::write(temp.path().join(OsStr::from_bytes(b"f\xff.txt")), b"").unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.list(false).unwrap(),
            Listing::Grouped {
                directories: vec!["caf\u{FFFD}".to_string()],
                files: vec!["f\u{FFFD}.txt".to_string()],
            }
        );
    }

    #[test]
    fn listing_a_vanished_directory_fails() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("gone")).unwrap();
        let mut session = session_in(&temp);
        session.change_directory("gone").unwrap();
        fs::remove_dir(temp.path().join("gone")).unwrap();

        assert_eq!(session.list(false), Err(FsError::EntryNotFound));
    }

    #[test]
    fn create_directory_once() {
        let temp = TempDir::new().unwrap();
        let session = session_in(&temp);

        assert_eq!(session.create_directory("new"), Ok(()));
        assert!(temp.path().join("new").is_dir());
        assert_eq!(mode_of(temp.path().join("new")) & 0o700, 0o700);

        assert_eq!(
            session.create_directory("new"),
            Err(FsError::AlreadyExists)
        );
    }

    #[test]
    fn create_file_truncates() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("log"), b"old contents").unwrap();
        let session = session_in(&temp);

        assert_eq!(session.create_file("log"), Ok(()));
        assert_eq!(session.create_file("fresh"), Ok(()));

        assert_eq!(fs::read(temp.path().join("log")).unwrap(), b"");
        assert!(temp.path().join("fresh").is_file());
    }

    #[test]
    fn create_file_in_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.create_file("no/such/file"),
            Err(FsError::EntryNotFound)
        );
    }

    #[test]
    fn delete_files_and_empty_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file"), b"x").unwrap();
        fs::create_dir(temp.path().join("empty")).unwrap();
        let session = session_in(&temp);

        assert_eq!(session.delete_item("file"), Ok(FileType::File));
        assert_eq!(session.delete_item("empty"), Ok(FileType::Dir));
        assert!(!temp.path().join("file").exists());
        assert!(!temp.path().join("empty").exists());
    }

    #[test]
    fn delete_refuses_non_empty_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("full")).unwrap();
        fs::write(temp.path().join("full/keep.txt"), b"keep").unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.delete_item("full"),
            Err(FsError::DirectoryNotEmpty)
        );
        assert_eq!(fs::read(temp.path().join("full/keep.txt")).unwrap(), b"keep");
    }

    #[test]
    fn delete_missing_entry() {
        let temp = TempDir::new().unwrap();
        let session = session_in(&temp);

        assert_eq!(session.delete_item("ghost"), Err(FsError::EntryNotFound));
    }

    #[test]
    fn delete_removes_symlink_not_target() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        fs::write(temp.path().join("real/inner"), b"").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();
        let session = session_in(&temp);

        assert_eq!(session.delete_item("alias"), Ok(FileType::Link));
        assert!(temp.path().join("real/inner").exists());
    }

    #[test]
    fn copy_preserves_contents_and_mode() {
        let temp = TempDir::new().unwrap();
        let contents: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(temp.path().join("src.bin"), &contents).unwrap();
        fs::set_permissions(temp.path().join("src.bin"), Permissions::from_mode(0o751)).unwrap();
        let session = session_in(&temp);

        assert_eq!(session.copy("src.bin", "dest.bin"), Ok(10_000));

        assert_eq!(fs::read(temp.path().join("dest.bin")).unwrap(), contents);
        assert_eq!(mode_of(temp.path().join("dest.bin")), 0o751);
    }

    #[test]
    fn copy_overwrites_existing_destination() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), b"new").unwrap();
        fs::write(temp.path().join("b"), b"older and longer").unwrap();
        let session = session_in(&temp);

        assert_eq!(session.copy("a", "b"), Ok(3));
        assert_eq!(fs::read(temp.path().join("b")).unwrap(), b"new");
    }

    #[test]
    fn copy_rejects_bad_sources() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        fs::write(temp.path().join("same"), b"data").unwrap();
        let session = session_in(&temp);

        assert_eq!(session.copy("missing", "x"), Err(FsError::EntryNotFound));
        assert_eq!(session.copy("dir", "x"), Err(FsError::NotARegularFile));
        assert!(matches!(
            session.copy("same", "same"),
            Err(FsError::InvalidArgument(_))
        ));
        assert_eq!(fs::read(temp.path().join("same")).unwrap(), b"data");
        assert!(!temp.path().join("x").exists());
    }

    #[test]
    fn copy_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), b"a").unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.copy("a", "missing/a"),
            Err(FsError::EntryNotFound)
        );
    }

    #[test]
    fn move_replaces_existing_destination() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"X").unwrap();
        fs::write(temp.path().join("b.txt"), b"Y").unwrap();
        let session = session_in(&temp);

        assert_eq!(session.move_item("a.txt", "b.txt"), Ok(()));

        assert_eq!(fs::read(temp.path().join("b.txt")).unwrap(), b"X");
        assert!(!temp.path().join("a.txt").exists());
    }

    #[test]
    fn move_directories_and_missing_sources() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("old/child")).unwrap();
        let session = session_in(&temp);

        assert_eq!(session.move_item("old", "new"), Ok(()));
        assert!(temp.path().join("new/child").is_dir());
        assert_eq!(
            session.move_item("old", "newer"),
            Err(FsError::EntryNotFound)
        );
    }

    #[test]
    fn files_cannot_replace_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.move_item("a.txt", "docs"),
            Err(FsError::IsADirectory)
        );
        assert_eq!(session.copy("a.txt", "docs"), Err(FsError::IsADirectory));
        assert_eq!(session.create_file("docs"), Err(FsError::IsADirectory));
        assert_eq!(
            session.move_item("a.txt", "docs").unwrap_err().to_string(),
            "is a directory"
        );
        assert!(temp.path().join("a.txt").is_file());
        assert!(temp.path().join("docs").is_dir());
    }

    #[test]
    fn search_starts_at_current_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/target.rs"), b"").unwrap();
        let mut session = session_in(&temp);
        session.change_directory("a").unwrap();

        assert_eq!(
            session.search("target"),
            vec![format!("{}/b/target.rs", session.current_path())]
        );
    }

    #[test]
    fn change_permissions_applies_octal_mode() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("script"), b"").unwrap();
        let session = session_in(&temp);

        assert_eq!(session.change_permissions("script", "750"), Ok(()));
        assert_eq!(mode_of(temp.path().join("script")), 0o750);

        assert_eq!(session.change_permissions("script", "000"), Ok(()));
        assert_eq!(mode_of(temp.path().join("script")), 0o000);
    }

    #[test]
    fn change_permissions_rejects_malformed_modes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f"), b"").unwrap();
        fs::set_permissions(temp.path().join("f"), Permissions::from_mode(0o644)).unwrap();
        let session = session_in(&temp);

        for mode in ["75", "7555", "", "abc", "789", "+75", "0o7"] {
            assert!(
                matches!(
                    session.change_permissions("f", mode),
                    Err(FsError::InvalidArgument(_))
                ),
                "{mode:?} was accepted"
            );
        }
        assert_eq!(mode_of(temp.path().join("f")), 0o644);
    }

    #[test]
    fn change_permissions_on_missing_file() {
        let temp = TempDir::new().unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.change_permissions("nope", "644"),
            Err(FsError::EntryNotFound)
        );
    }

    #[test]
    fn change_owner_to_self() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("mine"), b"").unwrap();
        let session = session_in(&temp);
        let uid = fs::metadata(temp.path().join("mine")).unwrap().uid();
        let gid = fs::metadata(temp.path().join("mine")).unwrap().gid();
        let name = users::owner_name(uid);
        if users::lookup_uid(&name).is_none() {
            // The test user has no passwd entry.
            return;
        }

        assert_eq!(session.change_owner("mine", &name), Ok(()));
        let metadata = fs::metadata(temp.path().join("mine")).unwrap();
        assert_eq!(metadata.uid(), uid);
        assert_eq!(metadata.gid(), gid);
    }

    #[test]
    fn change_owner_to_unknown_user() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("f"), b"").unwrap();
        let session = session_in(&temp);

        assert_eq!(
            session.change_owner("f", "no-such-user-fsh-test"),
            Err(FsError::InvalidArgument(
                "user not found: no-such-user-fsh-test".to_string()
            ))
        );
    }
}
