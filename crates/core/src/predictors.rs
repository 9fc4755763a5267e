//! Value predictors and the registry that names them.
//!
//! A predictor produces candidate values for a flag value or a positional
//! argument. Predictors are registered once under a name; model elements
//! refer to them by (possibly interpolated) name.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::interpolation::Vars;

/// What a predictor gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    /// The word being typed, possibly empty.
    pub last: &'a str,
    /// Words already typed after the program name.
    pub completed: &'a [String],
    /// Variables in effect at the completion point.
    pub vars: &'a Vars,
}

pub trait Predictor: Send + Sync {
    /// Candidates for `args.last`. Implementations decide how strictly they
    /// match the prefix.
    ///
    /// # Errors
    ///
    /// Predictors doing I/O may fail; the caller treats that as "no
    /// candidates" for this slot.
    fn predict(&self, args: &Args<'_>) -> Result<Vec<String>>;
}

impl<F> Predictor for F
where
    F: Fn(&Args<'_>) -> Result<Vec<String>> + Send + Sync,
{
    fn predict(&self, args: &Args<'_>) -> Result<Vec<String>> {
        self(args)
    }
}

/// A fixed set of values, filtered by prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictSet(Vec<String>);

impl PredictSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }
}

impl Predictor for PredictSet {
    fn predict(&self, args: &Args<'_>) -> Result<Vec<String>> {
        Ok(self
            .0
            .iter()
            .filter(|value| value.starts_with(args.last))
            .cloned()
            .collect())
    }
}

/// Offers nothing, leaving the shell to its defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictNothing;

impl Predictor for PredictNothing {
    fn predict(&self, _args: &Args<'_>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Filesystem entries starting with the typed prefix. Directories get a
/// trailing `/` so the user can keep descending.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictFiles {
    pub dirs_only: bool,
}

impl PredictFiles {
    #[must_use]
    pub fn dirs() -> Self {
        Self { dirs_only: true }
    }
}

impl Predictor for PredictFiles {
    fn predict(&self, args: &Args<'_>) -> Result<Vec<String>> {
        let pattern = format!("{}*", glob::Pattern::escape(args.last));
        let paths = glob::glob(&pattern).map_err(|e| Error::predictor_failed("files", e))?;

        let mut candidates = Vec::new();
        for path in paths.flatten() {
            let is_dir = path.is_dir();
            if self.dirs_only && !is_dir {
                continue;
            }
            let mut candidate = path.to_string_lossy().to_string();
            if is_dir && !candidate.ends_with('/') {
                candidate.push('/');
            }
            candidates.push(candidate);
        }

        Ok(candidates)
    }
}

#[derive(Clone, Default)]
pub struct PredictorRegistry {
    predictors: HashMap<String, Arc<dyn Predictor>>,
}

impl Debug for PredictorRegistry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.predictors.keys().collect();
        names.sort();
        formatter
            .debug_struct("PredictorRegistry")
            .field("predictors", &names)
            .finish()
    }
}

impl PredictorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with `anything`, `nothing`, `files` and `dirs`.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::new()
            .with("anything", PredictNothing)
            .with("nothing", PredictNothing)
            .with("files", PredictFiles::default())
            .with("dirs", PredictFiles::dirs())
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, predictor: impl Predictor + 'static) -> Self {
        self.register(name, predictor);
        self
    }

    /// Registers `predictor` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, predictor: impl Predictor + 'static) {
        let name = name.into();
        debug!("Registering predictor `{}`", name);
        self.predictors.insert(name, Arc::new(predictor));
    }

    /// Registers a closure as a predictor.
    #[must_use]
    pub fn with_fn<F>(mut self, name: impl Into<String>, predictor: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<Vec<String>> + Send + Sync + 'static,
    {
        self.register(name, predictor);
        self
    }

    /// Registers a [`PredictSet`] for every entry of `sets`.
    pub fn register_sets<S: std::hash::BuildHasher>(
        &mut self,
        sets: &HashMap<String, Vec<String>, S>,
    ) {
        for (name, values) in sets {
            self.register(name.clone(), PredictSet::new(values.iter().cloned()));
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.predictors.contains_key(name)
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownPredictor`] if nothing is registered as `name`.
    pub fn lookup(&self, name: &str) -> Result<&dyn Predictor> {
        self.predictors
            .get(name)
            .map(|predictor| predictor.as_ref())
            .ok_or_else(|| Error::UnknownPredictor(name.to_string()))
    }
}
