//! Rendering raw filesystem metadata into display strings.

use std::fmt;
use std::fs;
use std::os::unix::fs::MetadataExt;

use crate::users;

const S_IFMT: u32 = libc::S_IFMT as u32;
const S_IFDIR: u32 = libc::S_IFDIR as u32;
const S_IFREG: u32 = libc::S_IFREG as u32;
const S_IFLNK: u32 = libc::S_IFLNK as u32;
const S_IFCHR: u32 = libc::S_IFCHR as u32;
const S_IFBLK: u32 = libc::S_IFBLK as u32;
const S_IFIFO: u32 = libc::S_IFIFO as u32;
const S_IFSOCK: u32 = libc::S_IFSOCK as u32;

const PERMISSION_BITS: u32 = 0o777;
const USER_EXECUTE: u32 = 0o100;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Kind of a filesystem entry, derived from its mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// A directory
    Dir,
    /// A regular file
    File,
    /// A symbolic link
    Link,
    /// A character device
    CharDevice,
    /// A block device
    BlockDevice,
    /// A named pipe
    Fifo,
    /// A unix domain socket
    Socket,
    /// Mode bits that match none of the above
    Unknown,
}

impl FileType {
    /// Classify raw `st_mode` bits.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFDIR => FileType::Dir,
            S_IFREG => FileType::File,
            S_IFLNK => FileType::Link,
            S_IFCHR => FileType::CharDevice,
            S_IFBLK => FileType::BlockDevice,
            S_IFIFO => FileType::Fifo,
            S_IFSOCK => FileType::Socket,
            _ => FileType::Unknown,
        }
    }

    /// Short uppercase tag shown in detailed listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Dir => "DIR",
            FileType::File => "FILE",
            FileType::Link => "LINK",
            FileType::CharDevice => "CHR",
            FileType::BlockDevice => "BLK",
            FileType::Fifo => "FIFO",
            FileType::Socket => "SOCK",
            FileType::Unknown => "UNKN",
        }
    }

    pub fn is_dir(&self) -> bool {
        *self == FileType::Dir
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `rwxrwxrwx` style rendering of the user/group/other permission bits.
pub fn permission_string(mode: u32) -> String {
    const FLAGS: [char; 3] = ['r', 'w', 'x'];

    (0..9)
        .map(|i| {
            if mode & (0o400 >> i) != 0 {
                FLAGS[i % 3]
            } else {
                '-'
            }
        })
        .collect()
}

/// Format a byte count with two decimals and a binary unit, e.g. `1.50 KB`.
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.2} {}", SIZE_UNITS[unit])
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub file_type: FileType,
    /// The nine permission bits.
    pub mode: u32,
    pub owner: String,
    pub group: String,
    pub size: u64,
}

impl DirectoryEntry {
    pub(crate) fn from_metadata(name: String, metadata: &fs::Metadata) -> Self {
        let mode = metadata.mode();
        DirectoryEntry {
            name,
            file_type: FileType::from_mode(mode),
            mode: mode & PERMISSION_BITS,
            owner: users::owner_name(metadata.uid()),
            group: users::group_name(metadata.gid()),
            size: metadata.size(),
        }
    }

    pub fn permissions(&self) -> String {
        permission_string(self.mode)
    }

    pub fn human_size(&self) -> String {
        human_size(self.size)
    }

    /// Whether the owner may execute this entry.
    pub fn is_executable(&self) -> bool {
        self.mode & USER_EXECUTE != 0
    }
}
