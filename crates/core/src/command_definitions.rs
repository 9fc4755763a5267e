//! Declarative command, flag and argument definitions.
//!
//! These are the shapes read from a YAML model file, and they double as a
//! builder API for programs that describe their command tree in code.
//! A definition is turned into a validated [`crate::model::CommandTree`]
//! before any resolution happens.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

/// `set=key=value` style bindings applied to the variable environment.
pub type Bindings = BTreeMap<String, String>;

/// Whether an element is offered as a completion candidate.
///
/// An explicit `completion` override wins; otherwise hidden elements are
/// not offered.
pub(crate) fn is_offered(hidden: bool, completion: Option<bool>) -> bool {
    completion.unwrap_or(!hidden)
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FlagDefinition {
    pub name: String,
    #[serde(default)]
    pub short: Option<char>,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// The flag takes one value (`--name VALUE` or `--name=VALUE`).
    #[serde(default)]
    pub value: bool,
    #[serde(default)]
    pub predictor: Option<String>,
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub completion: Option<bool>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default)]
    pub set: Bindings,
}

impl FlagDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn takes_value(mut self) -> Self {
        self.value = true;
        self
    }

    /// Sets the predictor name template. Implies [`Self::takes_value`].
    #[must_use]
    pub fn predictor(mut self, template: impl Into<String>) -> Self {
        self.predictor = Some(template.into());
        self.value = true;
        self
    }

    /// Restricts the value to a closed set. Implies [`Self::takes_value`].
    #[must_use]
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self.value = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn completion(mut self, enabled: bool) -> Self {
        self.completion = Some(enabled);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_offered(&self) -> bool {
        is_offered(self.hidden, self.completion)
    }

    /// Every spelling the flag can be typed as, long forms first.
    #[must_use]
    pub fn spellings(&self) -> Vec<String> {
        let mut spellings = vec![format!("--{}", self.name)];
        spellings.extend(self.aliases.iter().map(|alias| format!("--{alias}")));
        if let Some(short) = self.short {
            spellings.push(format!("-{short}"));
        }
        spellings
    }
}

impl Display for FlagDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "--{}", self.name)?;

        if let Some(short) = self.short {
            write!(formatter, " (-{short})")?;
        }

        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArgDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub predictor: Option<String>,
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<String>,
    /// The argument absorbs every remaining positional word.
    #[serde(default)]
    pub cumulative: bool,
    #[serde(default)]
    pub set: Bindings,
}

impl ArgDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn predictor(mut self, template: impl Into<String>) -> Self {
        self.predictor = Some(template.into());
        self
    }

    #[must_use]
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn cumulative(mut self) -> Self {
        self.cumulative = true;
        self
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.insert(key.into(), value.into());
        self
    }
}

impl Display for ArgDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or("arg");
        if self.cumulative {
            write!(formatter, "<{name}>...")
        } else {
            write!(formatter, "<{name}>")
        }
    }
}

fn default_help_flag() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub completion: Option<bool>,
    /// Offer the built-in `--help`/`-h` pair.
    #[serde(default = "default_help_flag")]
    pub help_flag: bool,
    #[serde(default)]
    pub set: Bindings,
    #[serde(default)]
    pub flags: Vec<FlagDefinition>,
    #[serde(default)]
    pub args: Vec<ArgDefinition>,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

impl CommandDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            hidden: false,
            completion: None,
            help_flag: true,
            set: Bindings::new(),
            flags: Vec::new(),
            args: Vec::new(),
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn completion(mut self, enabled: bool) -> Self {
        self.completion = Some(enabled);
        self
    }

    #[must_use]
    pub fn without_help_flag(mut self) -> Self {
        self.help_flag = false;
        self
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: FlagDefinition) -> Self {
        self.flags.push(flag);
        self
    }

    #[must_use]
    pub fn arg(mut self, arg: ArgDefinition) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn subcommand(mut self, command: CommandDefinition) -> Self {
        self.commands.push(command);
        self
    }

    #[must_use]
    pub fn is_offered(&self) -> bool {
        is_offered(self.hidden, self.completion)
    }
}

impl Display for CommandDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)?;

        if !self.aliases.is_empty() {
            write!(formatter, " ({})", self.aliases.join(", "))?;
        }

        Ok(())
    }
}
