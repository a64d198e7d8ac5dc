//! Terminal presentation of operation outcomes.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;
use fsh_core::{DirectoryEntry, Listing};

const RULE_WIDTH: usize = 80;
const HELP_RULE_WIDTH: usize = 50;

pub(crate) fn banner(out: &mut impl Write) -> io::Result<()> {
    let lines = [
        "╔════════════════════════════════════════╗".to_string(),
        format!("║   {:<37}║", format!("fsh {}: File Explorer", crate::VERSION)),
        "║   Type 'help' for available commands   ║".to_string(),
        "╚════════════════════════════════════════╝".to_string(),
    ];
    for line in lines {
        writeln!(out, "{}", line.bold().green())?;
    }
    Ok(())
}

pub(crate) fn prompt(out: &mut impl Write, current_path: &str) -> io::Result<()> {
    write!(out, "\n{}", format!("[{current_path}]$ ").bold().blue())?;
    out.flush()
}

pub(crate) fn success(out: &mut impl Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "{}", message.to_string().green())
}

pub(crate) fn failure(out: &mut impl Write, context: &str, reason: impl Display) -> io::Result<()> {
    writeln!(out, "{}", format!("Error: {context}: {reason}").red())
}

pub(crate) fn listing(
    out: &mut impl Write,
    current_path: &str,
    listing: &Listing,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("\nCurrent Directory: {current_path}").bold().cyan()
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    match listing {
        Listing::Detailed(entries) => {
            writeln!(
                out,
                "{:<12}{:<10}{:<10}{:<12}{:<6}Name",
                "Permissions", "Owner", "Group", "Size", "Type"
            )?;
            writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
            for entry in entries {
                detailed_row(out, entry)?;
            }
        }
        Listing::Grouped { directories, files } => {
            for dir in directories {
                write!(out, "{}  ", format!("{dir}/").blue())?;
            }
            writeln!(out)?;
            for file in files {
                write!(out, "{file}  ")?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn detailed_row(out: &mut impl Write, entry: &DirectoryEntry) -> io::Result<()> {
    write!(
        out,
        "{:<12}{:<10}{:<10}{:<12}{:<6}",
        entry.permissions(),
        entry.owner,
        entry.group,
        entry.human_size(),
        entry.file_type.as_str()
    )?;

    if entry.file_type.is_dir() {
        writeln!(out, "{}", format!("{}/", entry.name).blue())
    } else if entry.is_executable() {
        writeln!(out, "{}", entry.name.green())
    } else {
        writeln!(out, "{}", entry.name)
    }
}

pub(crate) fn search_results(
    out: &mut impl Write,
    pattern: &str,
    results: &[String],
) -> io::Result<()> {
    writeln!(out, "{}", format!("Searching for: {pattern}").yellow())?;

    if results.is_empty() {
        return writeln!(out, "No files found matching the pattern.");
    }

    writeln!(out, "{}", format!("Found {} match(es):", results.len()).green())?;
    for path in results {
        writeln!(out, "  {path}")?;
    }
    Ok(())
}

pub(crate) fn help(out: &mut impl Write) -> io::Result<()> {
    const SECTIONS: &[(&str, &[(&str, &str)])] = &[
        (
            "Navigation:",
            &[
                ("ls", "List files in current directory"),
                ("ll", "List files with detailed information"),
                ("cd <dir>", "Change directory"),
                ("pwd", "Print current directory"),
            ],
        ),
        (
            "File Operations:",
            &[
                ("mkdir <name>", "Create directory"),
                ("touch <name>", "Create file"),
                ("rm <name>", "Delete file or directory"),
                ("cp <src> <dst>", "Copy file"),
                ("mv <src> <dst>", "Move/rename file"),
            ],
        ),
        ("Search:", &[("find <pattern>", "Search for files")]),
        (
            "Permissions:",
            &[
                (
                    "chmod <file> <mode>",
                    "Change permissions (e.g., chmod file.txt 755)",
                ),
                ("chown <file> <user>", "Change owner"),
            ],
        ),
        (
            "Other:",
            &[
                ("help", "Show this help"),
                ("exit", "Exit the application"),
            ],
        ),
    ];

    writeln!(out, "{}", "\n=== File Explorer Commands ===".bold().cyan())?;
    for (i, (title, commands)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", title.yellow())?;
        for (usage, description) in commands.iter() {
            writeln!(out, "  {usage:<15} - {description}")?;
        }
    }
    writeln!(out, "{}", "=".repeat(HELP_RULE_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsh_core::FileType;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn entry(name: &str, file_type: FileType, mode: u32, size: u64) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            file_type,
            mode,
            owner: "alice".to_string(),
            group: "staff".to_string(),
            size,
        }
    }

    #[test]
    fn grouped_listing_layout() {
        let listing = Listing::Grouped {
            directories: vec!["bin".to_string(), "src".to_string()],
            files: vec!["Cargo.toml".to_string()],
        };

        let text = render(|out| listing_into(out, &listing));

        let rule = "=".repeat(80);
        assert_eq!(
            text,
            format!("\nCurrent Directory: /work\n{rule}\nbin/  src/  \nCargo.toml  \n{rule}\n")
        );
    }

    fn listing_into(out: &mut Vec<u8>, l: &Listing) -> io::Result<()> {
        listing(out, "/work", l)
    }

    #[test]
    fn detailed_rows_are_aligned() {
        let listing = Listing::Detailed(vec![
            entry("src", FileType::Dir, 0o755, 4096),
            entry("build.sh", FileType::File, 0o744, 1536),
        ]);

        let text = render(|out| listing_into(out, &listing));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[3],
            "Permissions Owner     Group     Size        Type  Name"
        );
        assert_eq!(
            lines[5],
            "rwxr-xr-x   alice     staff     4.00 KB     DIR   src/"
        );
        assert_eq!(
            lines[6],
            "rwxr--r--   alice     staff     1.50 KB     FILE  build.sh"
        );
    }

    #[test]
    fn search_without_results() {
        let text = render(|out| search_results(out, "xyz", &[]));

        assert_eq!(
            text,
            "Searching for: xyz\nNo files found matching the pattern.\n"
        );
    }

    #[test]
    fn search_with_results() {
        let results = vec!["/a/x1".to_string(), "/a/b/x2".to_string()];

        let text = render(|out| search_results(out, "x", &results));

        assert_eq!(
            text,
            "Searching for: x\nFound 2 match(es):\n  /a/x1\n  /a/b/x2\n"
        );
    }

    #[test]
    fn help_lists_every_command() {
        let text = render(|out| help(out));

        for command in [
            "ls", "ll", "cd <dir>", "pwd", "mkdir", "touch", "rm", "cp", "mv", "find", "chmod",
            "chown", "help", "exit",
        ] {
            assert!(text.contains(&format!("  {command}")), "missing {command}");
        }
    }

    #[test]
    fn failures_carry_context_and_reason() {
        let text = render(|out| failure(out, "Cannot create directory", "file exists"));

        assert_eq!(text, "Error: Cannot create directory: file exists\n");
    }
}
