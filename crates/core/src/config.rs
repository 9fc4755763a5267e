//! Environment and path configuration for comptree.
//!
//! This module names the environment variables a completion request is read
//! from and resolves where model files live.

use std::path::PathBuf;

/// Environment variable holding the full line buffer.
pub const LINE_VARIABLE: &str = "COMP_LINE";
/// Environment variable holding the cursor offset into the line.
pub const POINT_VARIABLE: &str = "COMP_POINT";
/// Environment variable overriding the models directory.
pub const MODELS_DIR_VARIABLE: &str = "COMPTREE_MODELS_DIR";
/// Environment variable naming the user's login shell.
pub const SHELL_VARIABLE: &str = "SHELL";

/// Default directory holding one `<program>.yml` model per program
const DEFAULT_MODELS_DIR: &str = "~/.comptree/models";

/// Extension of model files.
pub const MODEL_EXTENSION: &str = "yml";

/// Resolves the models directory.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// models directory. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use comptree_core::config::get_models_dir;
///
/// let custom = get_models_dir(Some("/etc/comptree"));
/// assert_eq!(custom, "/etc/comptree");
/// ```
#[must_use]
pub fn get_models_dir(models_dir_arg: Option<&str>) -> String {
    let models_dir = models_dir_arg.unwrap_or(DEFAULT_MODELS_DIR);

    shellexpand::tilde(models_dir).to_string()
}

/// Path of the model describing `program`.
///
/// Only the basename of `program` is used, so `./bin/greet` and `greet`
/// share a model.
#[must_use]
pub fn get_model_path(models_dir: &str, program: &str) -> PathBuf {
    let name = std::path::Path::new(program)
        .file_name()
        .map_or_else(|| program.to_string(), |name| name.to_string_lossy().to_string());

    PathBuf::from(models_dir).join(format!("{name}.{MODEL_EXTENSION}"))
}
