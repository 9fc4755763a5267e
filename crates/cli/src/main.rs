use clap::Parser;
use comptree_core::config::{self, LINE_VARIABLE, MODELS_DIR_VARIABLE, POINT_VARIABLE};
use comptree_core::completion::write_candidates;
use comptree_core::error::Result;
use log::{debug, warn};
use std::env;
use std::io::stdout;
use std::process::ExitCode;

use comptree_cli::cli_args::{Args, Commands};
use comptree_cli::{commands, intercept};

/// Handles a completion request from the shell. Whatever happens, the
/// shell gets exit status 0 and at most a list of candidates.
fn complete_for_shell(line: &str) {
    let models_dir_arg = env::var(MODELS_DIR_VARIABLE).ok();
    let models_dir = config::get_models_dir(models_dir_arg.as_deref());
    let point = env::var(POINT_VARIABLE).ok();
    debug!("Completion request: `{}` at {:?}", line, point);

    if let Err(e) = intercept::answer(&models_dir, line, point.as_deref(), &mut stdout().lock()) {
        warn!("No candidates: {e}");
    }
}

fn execute() -> Result<()> {
    let args = Args::parse();
    let models_dir = config::get_models_dir(args.models_dir.as_deref());
    debug!("Models directory: `{}`", models_dir);

    match args.command {
        Commands::Init {
            program,
            shell,
            dynamic,
        } => {
            println!("{}", commands::init(&program, shell, dynamic)?);
        }
        Commands::Candidates {
            program,
            line,
            point,
        } => {
            let completion = commands::candidates(&models_dir, &program, &line, point)?;
            for problem in &completion.problems {
                eprintln!("warning: {problem}");
            }
            write_candidates(&mut stdout().lock(), &completion)?;
        }
        Commands::Check { program } => {
            let report = commands::check(&models_dir, &program)?;
            print!("{report}");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    if let Ok(line) = env::var(LINE_VARIABLE) {
        complete_for_shell(&line);
        return ExitCode::SUCCESS;
    }

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
