//! The read-eval-print loop.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use fsh_core::{FileType, Session};
use tracing::debug;

use crate::commands::{Command, ParseError};
use crate::render;

/// Whether the loop should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// The user asked to leave
    Exit,
}

/// An interactive session bound to an input and an output stream.
///
/// Failed commands are reported on the output and never end the loop; only
/// I/O errors on the streams themselves are returned.
#[derive(Debug)]
pub struct Repl<R, W> {
    session: Session,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Create a loop over `session`.
    pub fn new(session: Session, input: R, output: W) -> Self {
        Repl {
            session,
            input,
            output,
        }
    }

    /// The session driven by this loop.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Print the banner, then read and run commands until `exit`, `quit` or
    /// the end of input.
    pub fn run(&mut self) -> io::Result<()> {
        render::banner(&mut self.output)?;

        let mut line = Vec::new();
        loop {
            render::prompt(&mut self.output, self.session.current_path())?;

            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            if self.execute_line(&String::from_utf8_lossy(&line))? == Flow::Exit {
                break;
            }
        }

        render::success(&mut self.output, "Goodbye!")
    }

    /// Parse and run a single line.
    pub fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Flow::Continue),
            Err(error @ ParseError::Usage(_)) => {
                writeln!(self.output, "{}", error.to_string().red())?;
                Ok(Flow::Continue)
            }
            Err(error @ ParseError::Unknown(_)) => {
                writeln!(self.output, "{}", error.to_string().red())?;
                writeln!(self.output, "Type 'help' for available commands")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one parsed command against the session.
    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        debug!(?command, cwd = %self.session.current_path(), "executing");
        let out = &mut self.output;

        match command {
            Command::List => self.list(false)?,
            Command::ListDetailed => self.list(true)?,
            Command::PrintWorkingDirectory => writeln!(out, "{}", self.session.current_path())?,
            Command::ChangeDirectory(dir) => {
                if let Err(e) = self.session.change_directory(&dir) {
                    render::failure(out, "Directory not found or not accessible", e)?;
                }
            }
            Command::MakeDirectory(name) => match self.session.create_directory(&name) {
                Ok(()) => render::success(out, format!("Directory created successfully: {name}"))?,
                Err(e) => render::failure(out, "Cannot create directory", e)?,
            },
            Command::Touch(name) => match self.session.create_file(&name) {
                Ok(()) => render::success(out, format!("File created successfully: {name}"))?,
                Err(e) => render::failure(out, "Cannot create file", e)?,
            },
            Command::Remove(name) => match self.session.delete_item(&name) {
                Ok(FileType::Dir) => render::success(out, format!("Directory deleted: {name}"))?,
                Ok(_) => render::success(out, format!("File deleted: {name}"))?,
                Err(e) => render::failure(out, &format!("Cannot delete {name}"), e)?,
            },
            Command::Copy { src, dest } => match self.session.copy(&src, &dest) {
                Ok(_) => render::success(out, "File copied successfully")?,
                Err(e) => render::failure(out, "Cannot copy file", e)?,
            },
            Command::Move { src, dest } => match self.session.move_item(&src, &dest) {
                Ok(()) => render::success(out, "Item moved/renamed successfully")?,
                Err(e) => render::failure(out, "Cannot move/rename", e)?,
            },
            Command::Find(pattern) => {
                let results = self.session.search(&pattern);
                render::search_results(out, &pattern, &results)?;
            }
            Command::Chmod { name, mode } => match self.session.change_permissions(&name, &mode) {
                Ok(()) => render::success(out, "Permissions changed successfully")?,
                Err(e) => render::failure(out, "Cannot change permissions", e)?,
            },
            Command::Chown { name, owner } => match self.session.change_owner(&name, &owner) {
                Ok(()) => render::success(out, "Owner changed successfully")?,
                Err(e) => render::failure(out, "Cannot change owner", e)?,
            },
            Command::Help => render::help(out)?,
            Command::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    fn list(&mut self, detailed: bool) -> io::Result<()> {
        match self.session.list(detailed) {
            Ok(listing) => render::listing(&mut self.output, self.session.current_path(), &listing),
            Err(e) => render::failure(&mut self.output, "Cannot open directory", e),
        }
    }
}
