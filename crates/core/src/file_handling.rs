//! Reading model files.
//!
//! A model file is YAML holding the root command definition together with
//! global variables and static predictor sets. Loading validates the command
//! tree, so a model that loads is safe to resolve against.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::command_definitions::CommandDefinition;
use crate::error::{Error, Result};
use crate::interpolation::Vars;
use crate::model::CommandTree;
use crate::predictors::PredictorRegistry;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    pub command: CommandDefinition,
    #[serde(default)]
    pub vars: HashMap<String, String>,
    #[serde(default)]
    pub predictors: HashMap<String, Vec<String>>,
}

/// A validated model ready for resolution.
#[derive(Debug, Clone)]
pub struct Model {
    pub tree: CommandTree,
    pub vars: Vars,
    pub predictors: HashMap<String, Vec<String>>,
}

impl Model {
    /// # Errors
    ///
    /// Returns an error if the command tree breaks a model invariant.
    pub fn from_definition(definition: ModelDefinition) -> Result<Self> {
        Ok(Self {
            tree: CommandTree::new(definition.command)?,
            vars: Vars::from(definition.vars),
            predictors: definition.predictors,
        })
    }

    /// The built-in predictors plus this model's static sets.
    #[must_use]
    pub fn registry(&self) -> PredictorRegistry {
        let mut registry = PredictorRegistry::with_builtins();
        registry.register_sets(&self.predictors);
        registry
    }
}

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// Parses a model definition without validating the command tree.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or does
/// not match the model structure.
pub fn get_model_definition(model_path: &str) -> Result<ModelDefinition> {
    let reader = get_reader("model", model_path)?;

    let definition: ModelDefinition = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "model".to_string(),
            model_path.to_string(),
            e,
        )
    })?;

    if definition.command.name.is_empty() {
        return Err(Error::empty_model(model_path.to_string()));
    }

    Ok(definition)
}

/// Loads and validates the model at `model_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the command
/// tree breaks a model invariant (duplicate names, a cumulative argument
/// that is not last, and so on).
///
/// # Examples
///
/// ```no_run
/// use comptree_core::file_handling::load_model;
///
/// let model = load_model("/home/me/.comptree/models/greet.yml")?;
/// println!("Loaded {} commands", model.tree.len());
/// # Ok::<(), comptree_core::error::Error>(())
/// ```
pub fn load_model(model_path: impl AsRef<Path>) -> Result<Model> {
    let model_path = model_path.as_ref().to_string_lossy().to_string();
    debug!("Loading model `{}`", model_path);

    Model::from_definition(get_model_definition(&model_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_model(yaml: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();
        temp_file
    }

    #[test]
    fn test_load_model_valid_yaml() {
        let temp_file = write_model(
            r#"
vars:
  region: eu
predictors:
  names: [Ben, Liz]
command:
  name: greet
  commands:
    - name: hello
      args:
        - { name: name, predictor: names }
"#,
        );

        let model = load_model(temp_file.path()).unwrap();
        assert_eq!(model.tree.len(), 2);
        assert_eq!(model.vars.get("region"), Some("eu"));
        assert!(model.registry().contains("names"));
        assert!(model.registry().contains("files"));
    }

    #[test]
    fn test_load_model_invalid_yaml() {
        let temp_file = write_model("invalid: yaml: content: [");
        let result = load_model(temp_file.path());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_load_model_missing_command() {
        let temp_file = write_model("vars: {}\n");
        assert!(load_model(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_model_empty_name() {
        let temp_file = write_model("command:\n  name: \"\"\n");
        let result = load_model(temp_file.path());
        assert!(matches!(result, Err(Error::EmptyModel { .. })));
    }

    #[test]
    fn test_load_model_file_not_found() {
        let result = load_model("/this/path/does/not/exist.yml");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_model_with_validation_errors() {
        let temp_file = write_model(
            r#"
command:
  name: cp
  args:
    - { name: sources, cumulative: true }
    - { name: dest }
"#,
        );
        let result = load_model(temp_file.path());
        assert!(matches!(result, Err(Error::CumulativeNotLast { .. })));
    }

    #[test]
    fn test_yaml_flags_with_enum_or_predictor_take_values() {
        let temp_file = write_model(
            r#"
predictors:
  names: [Ben, Liz]
command:
  name: greet
  flags:
    - { name: hand, enum: [left, right] }
    - { name: who, predictor: names }
    - { name: loud }
  commands:
    - name: hello
"#,
        );

        let model = load_model(temp_file.path()).unwrap();
        let flags = &model.tree.node(model.tree.root()).flags;
        assert!(flags[0].value);
        assert!(flags[1].value);
        assert!(!flags[2].value);
    }
}
