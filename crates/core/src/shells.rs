//! Shell activation code.
//!
//! Each supported shell has two renderings: a one-liner that activates
//! completion in the running session, and the code to keep in an init file.
//! Both are `leon` templates filled from a [`BinaryInfo`].

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use leon::Template;

use crate::error::{Error, Result};

const BASH_DYNAMIC: &str = "source <('{bin_path}' {sub_cmd_name} --shell bash {bin_name})";
const BASH_PERSISTENT: &str = "complete -o default -o bashdefault -C '{bin_path}' {bin_name}";

const ZSH_DYNAMIC: &str = "source <('{bin_path}' {sub_cmd_name} --shell zsh {bin_name})";
const ZSH_PERSISTENT: &str = "autoload -U +X bashcompinit && bashcompinit
complete -o default -o bashdefault -C '{bin_path}' {bin_name}";

const FISH_DYNAMIC: &str = "'{bin_path}' {sub_cmd_name} --shell fish {bin_name} | source";
const FISH_PERSISTENT: &str = "function __complete_{bin_name}
    set -lx COMP_LINE (commandline -cp)
    test -z (commandline -ct)
    and set COMP_LINE \"$COMP_LINE \"
    set -lx COMP_POINT (string length -- \"$COMP_LINE\")
    '{bin_path}'
end
complete -f -c {bin_name} -a \"(__complete_{bin_name})\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Evaluated directly in the current session.
    Dynamic,
    /// Kept in the shell's init file.
    Persistent,
}

/// Substitution variables for the activation templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryInfo {
    /// The program whose words are completed.
    pub bin_name: String,
    /// Absolute path of the binary answering completion requests.
    pub bin_path: String,
    /// Subcommand of that binary printing activation code.
    pub sub_cmd_name: String,
}

impl BinaryInfo {
    /// Describes the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BinaryPath`] if the executable path can't be
    /// determined.
    pub fn current(bin_name: impl Into<String>, sub_cmd_name: impl Into<String>) -> Result<Self> {
        let bin_path = std::env::current_exe()
            .and_then(std::fs::canonicalize)
            .map_err(Error::BinaryPath)?;

        Ok(Self {
            bin_name: bin_name.into(),
            bin_path: bin_path.to_string_lossy().to_string(),
            sub_cmd_name: sub_cmd_name.into(),
        })
    }

    fn values(&self) -> HashMap<&'static str, &str> {
        HashMap::from([
            ("bin_name", self.bin_name.as_str()),
            ("bin_path", self.bin_path.as_str()),
            ("sub_cmd_name", self.sub_cmd_name.as_str()),
        ])
    }
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Bash, Shell::Zsh, Shell::Fish];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }

    /// Identifies a shell by the basename of its executable.
    #[must_use]
    pub fn from_executable(path: &str) -> Option<Self> {
        let name = Path::new(path).file_name()?.to_str()?;
        Self::ALL.into_iter().find(|shell| shell.name() == name)
    }

    /// Detects the shell from the value of `$SHELL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellNotDetected`] if no shell is set and
    /// [`Error::UnsupportedShell`] if it is not one of the supported ones.
    pub fn detect(shell_variable: Option<&str>) -> Result<Self> {
        let path = shell_variable
            .filter(|path| !path.trim().is_empty())
            .ok_or(Error::ShellNotDetected)?;

        Self::from_executable(path).ok_or_else(|| Error::UnsupportedShell(path.to_string()))
    }

    #[must_use]
    pub fn template(self, variant: Variant) -> &'static str {
        match (self, variant) {
            (Shell::Bash, Variant::Dynamic) => BASH_DYNAMIC,
            (Shell::Bash, Variant::Persistent) => BASH_PERSISTENT,
            (Shell::Zsh, Variant::Dynamic) => ZSH_DYNAMIC,
            (Shell::Zsh, Variant::Persistent) => ZSH_PERSISTENT,
            (Shell::Fish, Variant::Dynamic) => FISH_DYNAMIC,
            (Shell::Fish, Variant::Persistent) => FISH_PERSISTENT,
        }
    }

    /// Renders the activation code for `info`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template can't be parsed or rendered.
    pub fn render(self, variant: Variant, info: &BinaryInfo) -> Result<String> {
        let template = Template::parse(self.template(variant))?;
        Ok(template.render(&info.values())?)
    }
}

impl Display for Shell {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_executable(value).ok_or_else(|| Error::UnsupportedShell(value.to_string()))
    }
}
