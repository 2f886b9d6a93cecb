use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use shellpipe::{run_chain, Config, Input, PipeError, PipeOptions, ShellPipe};

fn main() -> ExitCode {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let commands: Vec<String> = std::env::args().skip(1).collect();
    let outcome = if commands.is_empty() {
        interactive(&config)
    } else {
        run_pipeline(&config, commands)
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("shellpipe: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Chains every command-line argument as one stage of a pipe.
fn run_pipeline(config: &Config, commands: Vec<String>) -> Result<ExitCode> {
    let options = config.apply(PipeOptions::default());
    match run_chain(commands, Input::Inherit, options) {
        Ok(Some(last)) => {
            print_stage(&last)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(report(&e)),
    }
}

fn interactive(config: &Config) -> Result<ExitCode> {
    // Ctrl-C belongs to the running child, not to us.
    ctrlc::set_handler(|| {}).context("installing SIGINT handler")?;

    let mut editor = DefaultEditor::new().context("starting line editor")?;
    if let Some(path) = &config.history_file {
        if editor.load_history(path).is_err() {
            debug!(path = %path.display(), "no history loaded");
        }
    }
    let options = config.apply(PipeOptions::default());

    loop {
        let line = match editor.readline(&config.prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("reading input"),
        };
        if line.trim().is_empty() {
            continue;
        }
        editor
            .add_history_entry(line.as_str())
            .context("recording history")?;

        match ShellPipe::run_with(line, Input::Inherit, options) {
            Ok(stage) => print_stage(&stage)?,
            Err(e) => {
                report(&e);
            }
        }
    }

    if let Some(path) = &config.history_file {
        editor.save_history(path).context("saving history")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn print_stage(stage: &ShellPipe) -> Result<()> {
    stage
        .write_output(&mut io::stdout().lock(), &mut io::stderr().lock())
        .context("writing output")
}

fn report(e: &PipeError) -> ExitCode {
    match e {
        PipeError::Status {
            command,
            code,
            signal,
            stderr,
        } => {
            error!(?command, ?code, ?signal, "command failed");
            eprint!("{stderr}");
        }
        other => eprintln!("shellpipe: {other}"),
    }
    ExitCode::from(e.exit_code())
}
