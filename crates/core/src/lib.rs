//! Comptree Core Library
//!
//! This crate provides the core functionality for comptree, a declarative
//! shell completion engine. A program's commands, flags and positional
//! arguments are described once as a model; the shell hands over the line
//! being edited and the cursor offset, and comptree answers with the words
//! that may come next.
//!
//! # Key Features
//!
//! - **Command Models**: Parse and validate YAML descriptions of a command tree
//! - **Resolution**: Walk the completed words to find what the current word is
//! - **Predictors**: Named candidate generators, selectable through `${var}` templates
//! - **Shell Activation**: Render the bash, zsh and fish code that wires comptree in
//! - **Error Handling**: One error type for configuration and request problems
//!
//! # Examples
//!
//! Completing a line against a model file:
//!
//! ```no_run
//! use comptree_core::completion::Completer;
//! use comptree_core::file_handling::load_model;
//!
//! let completer = Completer::from_model(load_model("~/.comptree/models/greet.yml")?);
//! for candidate in &completer.complete("greet he", 8).candidates {
//!     println!("{candidate}");
//! }
//! # Ok::<(), comptree_core::error::Error>(())
//! ```

pub mod command_definitions;
pub mod completion;
pub mod config;
pub mod emitter;
pub mod error;
pub mod file_handling;
pub mod interpolation;
pub mod model;
pub mod predictors;
pub mod resolver;
pub mod shells;
pub mod tokenizer;
