// SPDX-License-Identifier: AGPL-3.0
// Cardbook CLI - Main entry point
//
// Headless frontend over the shared core: browse, search, favorite, edit,
// share and preview business cards from the terminal.

mod commands;
mod session_bridge;
mod state;

use clap::Parser;
use commands::Command;
use session_bridge::SessionEvent;
use state::AppState;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "cardbook", version, about = "Digital business cards and contacts")]
struct Cli {
    /// Directory for settings and favorites instead of the platform default
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Print machine-readable JSON where supported
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// One line typed into the shell
#[derive(Debug, Parser)]
#[command(name = "cardbook>", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("cardbook_cli=info,cardbook_core=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting Cardbook v{}", env!("CARGO_PKG_VERSION"));

    let state = match AppState::new(cli.config_dir) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Shell => run_shell(&state),
        command => commands::execute(&state, command, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read commands line by line; in-memory edits last until the shell exits
fn run_shell(state: &AppState) -> Result<(), cardbook_core::AppError> {
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let events = state.bridge.event_receiver();

    loop {
        if interactive {
            print!("cardbook> ");
            std::io::stdout().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let args = match split_args(line) {
            Some(args) => args,
            None => {
                eprintln!("Unterminated quote");
                continue;
            }
        };

        match ShellLine::try_parse_from(args) {
            Ok(ShellLine {
                command: Command::Shell,
                ..
            }) => eprintln!("Already in the shell"),
            Ok(parsed) => {
                if let Err(e) = commands::execute(state, parsed.command, parsed.json) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(e) => {
                let _ = e.print();
            }
        }

        while let Ok(event) = events.try_recv() {
            match event {
                SessionEvent::ContactsChanged { count, favorites } => {
                    tracing::debug!("Contacts changed: {} shown, {} favorites", count, favorites);
                }
            }
        }
    }

    Ok(())
}

/// Split a shell line on whitespace, keeping double-quoted text together
fn split_args(line: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return None;
    }
    if has_token {
        args.push(current);
    }
    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args() {
        assert_eq!(
            split_args(r#"edit 3 --name "Ann Lee"  --notes """#).unwrap(),
            vec!["edit", "3", "--name", "Ann Lee", "--notes", ""]
        );
        assert!(split_args(r#"edit 3 --name "Ann"#).is_none());
    }

    #[test]
    fn test_shell_line_parses_commands() {
        let parsed = ShellLine::try_parse_from(["list", "--query", "an"]).unwrap();
        assert!(matches!(parsed.command, Command::List { query } if query == "an"));

        let parsed = ShellLine::try_parse_from(["--json", "show", "4"]).unwrap();
        assert!(parsed.json);
        assert!(matches!(parsed.command, Command::Show { id: 4 }));

        assert!(ShellLine::try_parse_from(["share", "1", "--via", "fax"]).is_err());
    }

    #[test]
    fn test_settings_command_parses_values() {
        let cli = Cli::try_parse_from(["cardbook", "settings", "--theme", "dark", "--seed-samples", "false"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Settings {
                theme: Some(cardbook_core::Theme::Dark),
                seed_samples: Some(false),
            }
        ));
        assert!(Cli::try_parse_from(["cardbook", "settings", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["cardbook", "card", "2", "--style", "modern", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Card { id: 2, .. }));
    }
}
