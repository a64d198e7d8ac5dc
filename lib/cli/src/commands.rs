//! The commands understood by the shell and how a line is parsed into one.

use thiserror::Error;

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ls`: names only, directories first
    List,
    /// `ll`: one line per entry with metadata
    ListDetailed,
    /// `pwd`
    PrintWorkingDirectory,
    /// `cd <dir>`
    ChangeDirectory(String),
    /// `mkdir <name>`
    MakeDirectory(String),
    /// `touch <name>`
    Touch(String),
    /// `rm <name>`
    Remove(String),
    /// `cp <src> <dest>`
    Copy {
        /// Existing regular file
        src: String,
        /// Where to write the copy
        dest: String,
    },
    /// `mv <src> <dest>`
    Move {
        /// Entry to rename
        src: String,
        /// New name
        dest: String,
    },
    /// `find <pattern>`
    Find(String),
    /// `chmod <file> <mode>`
    Chmod {
        /// Entry to change
        name: String,
        /// Three octal digits
        mode: String,
    },
    /// `chown <file> <user>`
    Chown {
        /// Entry to change
        name: String,
        /// User name to look up
        owner: String,
    },
    /// `help`
    Help,
    /// `exit` or `quit`
    Exit,
}

/// A line that doesn't form a valid command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A known command was given too few arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),
    /// The first word is not a command.
    #[error("Unknown command: {0}")]
    Unknown(String),
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for blank lines. Tokens are separated by
    /// whitespace and anything after the expected arguments is ignored.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let mut arg = |usage: &'static str| {
            tokens
                .next()
                .map(str::to_string)
                .ok_or(ParseError::Usage(usage))
        };

        let command = match name {
            "ls" => Command::List,
            "ll" => Command::ListDetailed,
            "pwd" => Command::PrintWorkingDirectory,
            "cd" => Command::ChangeDirectory(arg("cd <directory>")?),
            "mkdir" => Command::MakeDirectory(arg("mkdir <directory_name>")?),
            "touch" => Command::Touch(arg("touch <file_name>")?),
            "rm" => Command::Remove(arg("rm <file_or_directory>")?),
            "cp" => {
                const USAGE: &str = "cp <source> <destination>";
                Command::Copy {
                    src: arg(USAGE)?,
                    dest: arg(USAGE)?,
                }
            }
            "mv" => {
                const USAGE: &str = "mv <source> <destination>";
                Command::Move {
                    src: arg(USAGE)?,
                    dest: arg(USAGE)?,
                }
            }
            "find" => Command::Find(arg("find <pattern>")?),
            "chmod" => {
                const USAGE: &str = "chmod <file> <permissions>";
                Command::Chmod {
                    name: arg(USAGE)?,
                    mode: arg(USAGE)?,
                }
            }
            "chown" => {
                const USAGE: &str = "chown <file> <owner>";
                Command::Chown {
                    name: arg(USAGE)?,
                    owner: arg(USAGE)?,
                }
            }
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}
