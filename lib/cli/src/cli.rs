//! Process entry point: option parsing, logging and the interactive loop.

use std::io;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use fsh_core::Session;

use crate::repl::Repl;

/// The options for the fsh command line.
#[derive(Parser, Debug)]
#[clap(
    name = "fsh",
    about = "Interactive shell for exploring and managing the local filesystem.",
    version
)]
pub struct Fsh {
    /// Start in this directory instead of the current working directory
    #[clap(short = 'C', long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Never emit ANSI color codes
    #[clap(long)]
    pub no_color: bool,
}

impl Fsh {
    /// Run the shell on stdin/stdout until the user leaves.
    pub fn execute(self) -> Result<(), anyhow::Error> {
        if self.no_color || std::env::var_os("NO_COLOR").is_some() {
            colored::control::set_override(false);
        }

        let session = self.initial_session();

        Repl::new(session, io::stdin().lock(), io::stdout().lock())
            .run()
            .context("the terminal went away")
    }

    fn initial_session(&self) -> Session {
        let mut session = Session::from_current_dir();

        if let Some(dir) = &self.directory {
            if let Err(error) = session.change_directory(dir) {
                tracing::warn!(%dir, %error, "unusable start directory");
                eprintln!(
                    "{}",
                    format!(
                        "Warning: cannot start in {dir}: {error}; using {}",
                        session.current_path()
                    )
                    .yellow()
                );
            }
        }

        session
    }
}

/// The main function for the fsh binary.
pub fn fsh_main() {
    let args = Fsh::parse();
    crate::logging::set_up_logging();

    if let Err(error) = args.execute() {
        eprintln!("{}", format!("error: {error:?}").red());
        std::process::exit(1);
    }
}
