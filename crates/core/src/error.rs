use leon::{ParseError, RenderError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Undefined variable ${{{}}} in template `{}`", .name, .template)]
    UndefinedVariable { name: String, template: String },

    #[error("No predictor with name \"{}\"", .0)]
    UnknownPredictor(String),

    #[error("Predictor \"{}\" failed: {}", .name, .reason)]
    PredictorFailed { name: String, reason: String },

    #[error("The `{}` environment variable is not set.", .0)]
    MissingCursor(String),

    #[error("Invalid cursor offset in `{}`: \"{}\"", .variable, .value)]
    InvalidCursor { variable: String, value: String },

    #[error("Cumulative argument `{}` on command `{}` must be the last argument", .argument, .command)]
    CumulativeNotLast { command: String, argument: String },

    #[error("Found a non-unique command name or alias under `{}`: `{}`", .0, .1)]
    DuplicateCommandName(String, String),

    #[error("Found a non-unique flag name on command `{}`: `{}`", .0, .1)]
    DuplicateFlagName(String, String),

    #[error("Invalid name: names may not be empty")]
    EmptyName,

    #[error("Invalid name `{}`: names may not contain whitespace", .0)]
    NameWithSpace(String),

    #[error("Invalid short flag `{}`: must be a single character", .0)]
    InvalidShort(String),

    #[error("Invalid `set` binding on `{}`: keys may not be empty", .0)]
    InvalidBinding(String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("The model at `{}` does not define a program name. Is it empty?", .path)]
    EmptyModel { path: String },

    #[error("This shell is not supported ({})", .0)]
    UnsupportedShell(String),

    #[error("Couldn't determine the user's shell")]
    ShellNotDetected,

    #[error("Couldn't determine absolute path to binary: {}", .0)]
    BinaryPath(std::io::Error),

    #[error("Error parsing shell template: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error rendering shell template: {}", .0)]
    Render(#[from] RenderError),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn undefined_variable(name: &str, template: &str) -> Self {
        Self::UndefinedVariable {
            name: name.to_string(),
            template: template.to_string(),
        }
    }

    pub fn predictor_failed(name: &str, reason: impl ToString) -> Self {
        Self::PredictorFailed {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_cursor(variable: &str, value: &str) -> Self {
        Self::InvalidCursor {
            variable: variable.to_string(),
            value: value.to_string(),
        }
    }

    pub fn empty_model(path: String) -> Self {
        Self::EmptyModel { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
