use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use bytes::Bytes;
use nix::sys::signal::Signal;

use crate::tokenizer::parse;
use crate::types::{PipeError, PipeResult};

/// A command either pre-split into argv or still in shell syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Args(Vec<String>),
    Line(String),
}

impl CommandLine {
    pub fn into_args(self) -> PipeResult<Vec<String>> {
        match self {
            CommandLine::Args(args) => Ok(args),
            CommandLine::Line(line) => Ok(parse(&line)?),
        }
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        CommandLine::Line(line.to_string())
    }
}

impl From<String> for CommandLine {
    fn from(line: String) -> Self {
        CommandLine::Line(line)
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(args: Vec<String>) -> Self {
        CommandLine::Args(args)
    }
}

impl From<&[&str]> for CommandLine {
    fn from(args: &[&str]) -> Self {
        CommandLine::Args(args.iter().map(|s| s.to_string()).collect())
    }
}

/// Where the first stage of a pipe reads its stdin from.
#[derive(Debug, Default)]
pub enum Input {
    #[default]
    Inherit,
    Null,
    Bytes(Bytes),
    File(File),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeOptions {
    /// Fail with `PipeError::Status` when a stage exits unsuccessfully.
    pub check_status: bool,
}

impl Default for PipeOptions {
    fn default() -> Self {
        Self { check_status: true }
    }
}

/// One finished stage of a pipe, with its output captured.
///
/// Stages run eagerly: by the time a `ShellPipe` exists its process has
/// exited. Chaining with [`ShellPipe::pipe`] feeds the captured stdout to the
/// next command.
#[derive(Debug)]
pub struct ShellPipe {
    command: Vec<String>,
    status: ExitStatus,
    stdout: Bytes,
    stderr: Bytes,
    options: PipeOptions,
}

impl ShellPipe {
    pub fn run(cmd: impl Into<CommandLine>) -> PipeResult<Self> {
        Self::run_with(cmd, Input::default(), PipeOptions::default())
    }

    pub fn run_with(
        cmd: impl Into<CommandLine>,
        input: Input,
        options: PipeOptions,
    ) -> PipeResult<Self> {
        let command = cmd.into().into_args()?;
        let (program, args) = command.split_first().ok_or(PipeError::EmptyCommand)?;

        let mut feed = None;
        let stdin = match input {
            Input::Inherit => Stdio::inherit(),
            Input::Null => Stdio::null(),
            Input::File(file) => Stdio::from(file),
            Input::Bytes(data) => {
                feed = Some(data);
                Stdio::piped()
            }
        };

        tracing::debug!(?command, "spawning");
        let mut child = Command::new(program)
            .args(args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PipeError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Written from a separate thread so a child that fills its stdout
        // before draining stdin cannot deadlock us.
        let writer = match (feed, child.stdin.take()) {
            (Some(data), Some(mut sink)) => Some(thread::spawn(move || sink.write_all(&data))),
            _ => None,
        };

        let output = child.wait_with_output().map_err(|source| PipeError::Io {
            command: command.clone(),
            source,
        })?;

        if let Some(handle) = writer {
            let written = handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            match written {
                Ok(()) => {}
                // The child is free to exit without reading all of its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(source) => return Err(PipeError::Io { command, source }),
            }
        }

        let status = output.status;
        if !status.success() {
            let signal = status.signal().and_then(|sig| Signal::try_from(sig).ok());
            if options.check_status {
                return Err(PipeError::Status {
                    command,
                    code: status.code(),
                    signal,
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                });
            }
            tracing::warn!(?command, code = ?status.code(), ?signal, "command failed, continuing");
        }

        Ok(Self {
            command,
            status,
            stdout: Bytes::from(output.stdout),
            stderr: Bytes::from(output.stderr),
            options,
        })
    }

    /// Runs `next` with this stage's stdout as its stdin.
    pub fn pipe(self, next: impl Into<CommandLine>) -> PipeResult<Self> {
        Self::run_with(next, Input::Bytes(self.stdout), self.options)
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    pub fn stdout(&self) -> &Bytes {
        &self.stdout
    }

    pub fn stderr(&self) -> &Bytes {
        &self.stderr
    }

    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn options(&self) -> PipeOptions {
        self.options
    }

    /// Copies the captured stdout to `out` and the captured stderr to `err`.
    pub fn write_output<W: Write, E: Write>(&self, out: &mut W, err: &mut E) -> io::Result<()> {
        out.write_all(&self.stdout)?;
        out.flush()?;
        err.write_all(&self.stderr)?;
        err.flush()
    }
}

/// Runs `commands` left to right, each fed the previous stage's stdout.
///
/// `input` is the stdin of the first stage. Returns `None` for an empty list.
pub fn run_chain<I>(commands: I, input: Input, options: PipeOptions) -> PipeResult<Option<ShellPipe>>
where
    I: IntoIterator,
    I::Item: Into<CommandLine>,
{
    let mut stages = commands.into_iter();
    let Some(first) = stages.next() else {
        return Ok(None);
    };
    let head = ShellPipe::run_with(first, input, options)?;
    stages.try_fold(head, |prev, next| prev.pipe(next)).map(Some)
}

impl fmt::Display for ShellPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.stdout))
    }
}
