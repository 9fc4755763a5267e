//! Variable interpolation for templated model metadata.
//!
//! Predictor names may contain `${name}` or `${name=default}` placeholders
//! which are resolved against a [`Vars`] environment. `$$` produces a
//! literal `$`.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{Error, Result};

static INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$\$)|(?:\$\{([[:alpha:]_][[:word:]]*)(?:=([^}]+))?\})|(\$)|([^$]+)")
        .expect("interpolation pattern is valid")
});

/// An immutable variable environment.
///
/// Extending it never touches the original: [`Vars::with`] hands back a new
/// environment and leaves every other holder of the old one unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    values: Arc<HashMap<String, String>>,
}

impl Vars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an environment with `bindings` layered on top of this one.
    ///
    /// When the bindings change nothing the same shared map is returned.
    #[must_use]
    pub fn with<'a, I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let changed: Vec<(&String, &String)> = bindings
            .into_iter()
            .filter(|(key, value)| self.get(key) != Some(value.as_str()))
            .collect();

        if changed.is_empty() {
            return self.clone();
        }

        let mut values = (*self.values).clone();
        for (key, value) in changed {
            values.insert(key.clone(), value.clone());
        }

        Self {
            values: Arc::new(values),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Vars {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: Arc::new(
                iter.into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl<S: std::hash::BuildHasher> From<HashMap<String, String, S>> for Vars {
    fn from(values: HashMap<String, String, S>) -> Self {
        values.into_iter().collect()
    }
}

/// Interpolates variables from `vars` into `template`.
///
/// # Errors
///
/// Returns [`Error::UndefinedVariable`] when a placeholder names a variable
/// that is not bound and carries no inline default.
pub fn interpolate(template: &str, vars: &Vars) -> Result<String> {
    let mut out = String::with_capacity(template.len());

    for captures in INTERPOLATION.captures_iter(template) {
        if captures.get(1).is_some() {
            out.push('$');
        } else if let Some(name) = captures.get(2) {
            let value = match (vars.get(name.as_str()), captures.get(3)) {
                (Some(value), _) => value,
                (None, Some(default)) => default.as_str(),
                (None, None) => return Err(Error::undefined_variable(name.as_str(), template)),
            };
            out.push_str(value);
        } else if let Some(text) = captures.get(0) {
            out.push_str(text.as_str());
        }
    }

    Ok(out)
}
