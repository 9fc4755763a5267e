//! The `init`, `candidates` and `check` subcommands.

use std::env;
use std::fmt::{Display, Formatter};

use comptree_core::completion::Completer;
use comptree_core::config::{get_model_path, SHELL_VARIABLE};
use comptree_core::emitter::Completion;
use comptree_core::error::Result;
use comptree_core::file_handling::{load_model, Model};
use comptree_core::model::NodeId;
use comptree_core::predictors::PredictorRegistry;
use comptree_core::shells::{BinaryInfo, Shell, Variant};
use itertools::Itertools;
use log::debug;

/// Name of the subcommand printing activation code, as the dynamic
/// one-liners invoke it.
pub const INIT_SUBCOMMAND: &str = "init";

/// Activation code for `program`.
///
/// # Errors
///
/// Returns an error if no shell is given and `$SHELL` names none of the
/// supported ones, or if this binary's path can't be determined.
pub fn init(program: &str, shell: Option<Shell>, dynamic: bool) -> Result<String> {
    let shell = match shell {
        Some(shell) => shell,
        None => Shell::detect(env::var(SHELL_VARIABLE).ok().as_deref())?,
    };
    let variant = if dynamic {
        Variant::Dynamic
    } else {
        Variant::Persistent
    };
    debug!("Rendering {:?} activation for {} in {}", variant, program, shell);

    shell.render(variant, &BinaryInfo::current(program, INIT_SUBCOMMAND)?)
}

/// Completes `line` against the model of `program`. The cursor defaults to
/// the end of the line.
///
/// # Errors
///
/// Returns an error if the model can't be loaded.
pub fn candidates(models_dir: &str, program: &str, line: &str, point: Option<usize>) -> Result<Completion> {
    let model = load_model(get_model_path(models_dir, program))?;
    let completer = Completer::from_model(model);
    Ok(completer.complete(line, point.unwrap_or(line.len())))
}

/// What `check` found out about a model.
#[derive(Debug)]
pub struct Report {
    pub program: String,
    /// Every command path, root first.
    pub commands: Vec<String>,
    /// Flags marked `required`, as `<command path> --<flag>`.
    pub required_flags: Vec<String>,
    /// Predictor names referenced without interpolation that the model
    /// doesn't provide.
    pub unknown_predictors: Vec<String>,
}

impl Report {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unknown_predictors.is_empty()
    }
}

impl Display for Report {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(formatter, "Model for `{}` is valid.", self.program)?;
        writeln!(formatter, "Commands:")?;
        for command in &self.commands {
            writeln!(formatter, "\t{command}")?;
        }

        if !self.required_flags.is_empty() {
            writeln!(formatter, "Required flags:")?;
            for flag in &self.required_flags {
                writeln!(formatter, "\t{flag}")?;
            }
        }

        if !self.is_clean() {
            writeln!(
                formatter,
                "Unknown predictors: {}",
                self.unknown_predictors.iter().join(", ")
            )?;
        }

        Ok(())
    }
}

fn command_path(model: &Model, id: NodeId) -> String {
    model
        .tree
        .lineage(id)
        .into_iter()
        .rev()
        .map(|node| model.tree.node(node).name.as_str())
        .join(" ")
}

fn predictor_references(model: &Model) -> impl Iterator<Item = &str> {
    model.tree.iter().flat_map(|(_, node)| {
        node.flags
            .iter()
            .filter_map(|flag| flag.predictor.as_deref())
            .chain(node.args.iter().filter_map(|arg| arg.predictor.as_deref()))
    })
}

/// Loads and validates the model of `program`, listing its commands and
/// required flags.
///
/// # Errors
///
/// Returns an error if the model can't be loaded or breaks a model
/// invariant.
pub fn check(models_dir: &str, program: &str) -> Result<Report> {
    let model = load_model(get_model_path(models_dir, program))?;
    let registry: PredictorRegistry = model.registry();

    let commands = model
        .tree
        .iter()
        .map(|(id, _)| command_path(&model, id))
        .collect();

    let required_flags = model
        .tree
        .iter()
        .flat_map(|(id, node)| {
            let path = command_path(&model, id);
            node.flags
                .iter()
                .filter(|flag| flag.required)
                .map(move |flag| format!("{path} --{}", flag.name))
        })
        .collect();

    // Templates are only known once variables are bound.
    let unknown_predictors = predictor_references(&model)
        .filter(|name| !name.contains("${") && !registry.contains(name))
        .map(ToString::to_string)
        .sorted()
        .dedup()
        .collect();

    Ok(Report {
        program: program.to_string(),
        commands,
        required_flags,
        unknown_predictors,
    })
}
