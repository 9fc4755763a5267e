//! One completion request, end to end.
//!
//! [`Completer`] owns the command tree, the predictor registry and the
//! global variables, all read-only once built. Each call tokenizes a line,
//! resolves it and emits candidates; nothing carries over between calls.

use std::io::Write;

use log::debug;

use crate::config::{LINE_VARIABLE, POINT_VARIABLE};
use crate::emitter::{emit, Completion};
use crate::error::{Error, Result};
use crate::file_handling::Model;
use crate::interpolation::Vars;
use crate::model::CommandTree;
use crate::predictors::PredictorRegistry;
use crate::resolver::{resolve, ResolvePolicy};
use crate::tokenizer::tokenize;

#[derive(Debug, Clone)]
pub struct Completer {
    tree: CommandTree,
    registry: PredictorRegistry,
    vars: Vars,
    policy: ResolvePolicy,
}

impl Completer {
    #[must_use]
    pub fn new(tree: CommandTree, registry: PredictorRegistry) -> Self {
        Self {
            tree,
            registry,
            vars: Vars::new(),
            policy: ResolvePolicy::default(),
        }
    }

    #[must_use]
    pub fn from_model(model: Model) -> Self {
        let registry = model.registry();
        Self::new(model.tree, registry).with_vars(model.vars)
    }

    #[must_use]
    pub fn with_vars(mut self, vars: Vars) -> Self {
        self.vars = vars;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Candidates for `line` with the cursor at byte offset `cursor`.
    #[must_use]
    pub fn complete(&self, line: &str, cursor: usize) -> Completion {
        let Some(line) = tokenize(line, cursor).into_line() else {
            debug!("Cursor is on the program name, nothing to complete");
            return Completion::default();
        };

        let resolution = resolve(&self.tree, &line, &self.vars, self.policy);
        debug!("Resolved to {:?}", resolution.position);

        emit(&self.tree, &self.registry, &resolution, &line.completed)
    }

    /// Answers a request described by the raw `COMP_LINE`/`COMP_POINT`
    /// values. Returns `None` when `line` is absent, which means the process
    /// was not invoked for completion at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor offset is missing or not a number.
    pub fn complete_request(
        &self,
        line: Option<&str>,
        point: Option<&str>,
    ) -> Option<Result<Completion>> {
        let line = line?;
        Some(parse_point(point).map(|cursor| self.complete(line, cursor)))
    }

    /// Reads the request from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Completer::complete_request`].
    pub fn complete_env(&self) -> Option<Result<Completion>> {
        let line = std::env::var(LINE_VARIABLE).ok();
        let point = std::env::var(POINT_VARIABLE).ok();
        self.complete_request(line.as_deref(), point.as_deref())
    }
}

/// Parses the cursor offset.
///
/// # Errors
///
/// Returns [`Error::MissingCursor`] when absent and [`Error::InvalidCursor`]
/// when not a non-negative integer.
pub fn parse_point(point: Option<&str>) -> Result<usize> {
    let point = point.ok_or_else(|| Error::MissingCursor(POINT_VARIABLE.to_string()))?;
    point
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::invalid_cursor(POINT_VARIABLE, point))
}

/// Writes one candidate per line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_candidates<W: Write>(out: &mut W, completion: &Completion) -> Result<()> {
    for candidate in &completion.candidates {
        writeln!(out, "{candidate}")?;
    }
    out.flush()?;
    Ok(())
}
