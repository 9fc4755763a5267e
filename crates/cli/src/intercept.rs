//! Answering a shell's completion request.
//!
//! Shells started through `complete -C` (or the fish function) run comptree
//! with `COMP_LINE` and `COMP_POINT` set. In that mode stdout carries
//! nothing but candidates, one per line.

use std::io::Write;

use comptree_core::completion::{parse_point, write_candidates, Completer};
use comptree_core::config::get_model_path;
use comptree_core::error::Result;
use comptree_core::file_handling::load_model;
use log::{debug, warn};

/// The program being completed: the first word of the line.
#[must_use]
pub fn program_from_line(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Loads the model for the program named on `line` and writes the
/// candidates for it to `out`.
///
/// # Errors
///
/// Returns an error if the cursor is missing or malformed, if the model
/// can't be loaded, or if writing fails. Nothing is written in that case.
pub fn answer<W: Write>(models_dir: &str, line: &str, point: Option<&str>, out: &mut W) -> Result<()> {
    let cursor = parse_point(point)?;

    let Some(program) = program_from_line(line) else {
        debug!("Empty completion line");
        return Ok(());
    };

    let model_path = get_model_path(models_dir, program);
    let completer = Completer::from_model(load_model(&model_path)?);
    let completion = completer.complete(line, cursor);

    for problem in &completion.problems {
        warn!("Model `{}`: {}", model_path.display(), problem);
    }

    write_candidates(out, &completion)
}
