//! Command-line argument parsing and validation.
//!
//! This module defines the command-line interface structure using the
//! `clap` crate. It is only consulted when the process was not started by
//! a shell asking for completions.

use clap::{Parser, Subcommand};
use comptree_core::config::MODELS_DIR_VARIABLE;
use comptree_core::shells::Shell;

/// Command-line arguments for the comptree CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use comptree_cli::cli_args::Args;
///
/// let args = Args::parse_from(["comptree", "check", "greet"]);
/// assert!(args.models_dir.is_none());
/// ```
#[derive(Parser, Debug)]
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Directory holding one `<program>.yml` model per program.
    ///
    /// If not provided, defaults to `~/.comptree/models`.
    #[arg(long, short = 'm', global = true, env = MODELS_DIR_VARIABLE)]
    pub models_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the code that activates completion for a program.
    Init {
        /// The program to complete.
        program: String,

        /// Target shell. Detected from `$SHELL` when omitted.
        #[arg(long, short = 's', value_parser = parse_shell)]
        shell: Option<Shell>,

        /// Print a one-liner for the current session instead of init file code.
        #[arg(long, short = 'd', action)]
        dynamic: bool,
    },

    /// Print the candidates for a line, as the shell would receive them.
    Candidates {
        /// The program whose model is used.
        program: String,

        /// The full line, program name included.
        line: String,

        /// Cursor offset into the line. Defaults to the end of the line.
        #[arg(long, short = 'p')]
        point: Option<usize>,
    },

    /// Load a model and report problems with it.
    Check {
        /// The program whose model is checked.
        program: String,
    },
}

fn parse_shell(value: &str) -> Result<Shell, String> {
    value.parse::<Shell>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_init_defaults() {
        let args = Args::parse_from(["comptree", "init", "greet"]);

        assert_eq!(
            args.command,
            Commands::Init {
                program: "greet".to_string(),
                shell: None,
                dynamic: false,
            }
        );
    }

    #[test]
    fn test_init_short_flags() {
        let args = Args::parse_from(["comptree", "init", "-s", "zsh", "-d", "greet"]);

        assert_eq!(
            args.command,
            Commands::Init {
                program: "greet".to_string(),
                shell: Some(Shell::Zsh),
                dynamic: true,
            }
        );
    }

    #[test]
    fn test_init_rejects_unknown_shell() {
        let result = Args::try_parse_from(["comptree", "init", "--shell", "tcsh", "greet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_candidates() {
        let args = Args::parse_from([
            "comptree",
            "--models-dir",
            "/custom/models",
            "candidates",
            "greet",
            "greet hel",
            "--point",
            "7",
        ]);

        assert_eq!(args.models_dir, Some("/custom/models".to_string()));
        assert_eq!(
            args.command,
            Commands::Candidates {
                program: "greet".to_string(),
                line: "greet hel".to_string(),
                point: Some(7),
            }
        );
    }

    #[test]
    fn test_models_dir_after_subcommand() {
        let args = Args::parse_from(["comptree", "check", "greet", "-m", "/custom/models"]);

        assert_eq!(args.models_dir, Some("/custom/models".to_string()));
        assert_eq!(
            args.command,
            Commands::Check {
                program: "greet".to_string()
            }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["comptree"]).is_err());
    }
}
