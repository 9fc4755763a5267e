//! Turns a [`Resolution`] into the candidates offered to the shell.

use indexmap::IndexSet;
use log::warn;

use crate::command_definitions::Bindings;
use crate::error::{Error, Result};
use crate::interpolation::{interpolate, Vars};
use crate::model::{CommandTree, FlagId};
use crate::predictors::{Args, PredictSet, Predictor, PredictorRegistry};
use crate::resolver::{Position, Resolution};

/// Candidates for one request, plus the configuration problems met while
/// producing them.
#[derive(Debug, Default)]
pub struct Completion {
    pub candidates: IndexSet<String>,
    pub problems: Vec<Error>,
}

impl Completion {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates sorted, for order-independent comparison.
    #[must_use]
    pub fn sorted(&self) -> Vec<String> {
        let mut candidates: Vec<String> = self.candidates.iter().cloned().collect();
        candidates.sort();
        candidates
    }
}

/// A predictor-backed slot: a value-taking flag or a positional argument.
struct Slot<'m> {
    label: String,
    predictor: Option<&'m str>,
    enum_values: &'m [String],
    set: &'m Bindings,
}

struct Emitter<'a> {
    tree: &'a CommandTree,
    registry: &'a PredictorRegistry,
    resolution: &'a Resolution,
    completed: &'a [String],
    completion: Completion,
}

impl<'a> Emitter<'a> {
    fn flags(&mut self) {
        let prefix = self.resolution.last.as_str();
        let mut spellings = Vec::new();

        for id in &self.resolution.eligible_flags {
            let flag = self.tree.flag(*id);
            if flag.is_offered() {
                spellings.extend(flag.spellings());
            }
        }
        if self.resolution.offer_help {
            spellings.extend(["--help".to_string(), "-h".to_string()]);
        }

        self.completion
            .candidates
            .extend(spellings.into_iter().filter(|s| s.starts_with(prefix)));
    }

    fn subcommands(&mut self) {
        let prefix = self.resolution.last.as_str();

        for (_, child) in self.tree.children(self.resolution.node) {
            if !child.is_offered() {
                continue;
            }
            self.completion.candidates.extend(
                child
                    .names()
                    .filter(|name| name.starts_with(prefix))
                    .map(ToString::to_string),
            );
        }
    }

    fn predict(&self, slot: &Slot<'_>, last: &str) -> Result<Vec<String>> {
        let vars: Vars = self.resolution.vars.with(slot.set);
        let args = Args {
            last,
            completed: self.completed,
            vars: &vars,
        };

        match slot.predictor {
            Some(template) => {
                let name = interpolate(template, &vars)?;
                self.registry.lookup(&name)?.predict(&args)
            }
            None if !slot.enum_values.is_empty() => {
                PredictSet::new(slot.enum_values.iter().cloned()).predict(&args)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Runs a slot's predictor; a failure costs this slot its candidates
    /// and nothing else.
    fn slot(&mut self, slot: &Slot<'_>, last: &str, head: &str) {
        match self.predict(slot, last) {
            Ok(values) => self
                .completion
                .candidates
                .extend(values.into_iter().map(|value| format!("{head}{value}"))),
            Err(e) => {
                warn!("No candidates for {}: {}", slot.label, e);
                self.completion.problems.push(e);
            }
        }
    }

    fn flag_slot(&self, id: FlagId) -> Slot<'a> {
        let flag = self.tree.flag(id);
        Slot {
            label: flag.to_string(),
            predictor: flag.predictor.as_deref(),
            enum_values: &flag.enum_values,
            set: &flag.set,
        }
    }

    fn arg_slot(&self) -> Option<Slot<'a>> {
        let index = self.resolution.next_arg?;
        let arg = &self.tree.node(self.resolution.node).args[index];
        Some(Slot {
            label: arg.to_string(),
            predictor: arg.predictor.as_deref(),
            enum_values: &arg.enum_values,
            set: &arg.set,
        })
    }

    fn emit(mut self) -> Completion {
        let resolution = self.resolution;

        match &resolution.position {
            Position::Flag => self.flags(),
            Position::FlagValue(id) => {
                let slot = self.flag_slot(*id);
                self.slot(&slot, &resolution.last, "");
            }
            Position::InlineValue { flag, head, value } => {
                let slot = self.flag_slot(*flag);
                self.slot(&slot, value, head);
            }
            Position::Word => {
                if resolution.can_descend {
                    self.subcommands();
                }
                if let Some(slot) = self.arg_slot() {
                    self.slot(&slot, &resolution.last, "");
                }
            }
        }

        self.completion
    }
}

/// Produces the deduplicated candidates for `resolution`.
#[must_use]
pub fn emit(
    tree: &CommandTree,
    registry: &PredictorRegistry,
    resolution: &Resolution,
    completed: &[String],
) -> Completion {
    Emitter {
        tree,
        registry,
        resolution,
        completed,
        completion: Completion::default(),
    }
    .emit()
}
