//! Comptree CLI Library
//!
//! This crate provides the `comptree` binary: a generic completer for any
//! program whose command tree is described in a YAML model file.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`intercept`]: Answering a shell's completion request (`COMP_LINE` set)
//! - [`commands`]: The `init`, `candidates` and `check` subcommands
//!
//! # Examples
//!
//! ```bash
//! # Activate completion for `greet` in the current bash session
//! source <(comptree init --shell bash greet)
//!
//! # What would the shell be offered after `greet he`?
//! comptree candidates greet "greet he"
//!
//! # Validate ~/.comptree/models/greet.yml
//! comptree check greet
//! ```

pub mod cli_args;
pub mod commands;
pub mod intercept;
