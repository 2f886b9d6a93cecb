//! Shell-style command-line tokenizing and simple process pipes.
//!
//! `parse` splits a command string the way a POSIX shell splits words,
//! honoring quotes and backslash escapes but never globbing or expanding
//! variables. `ShellPipe` runs the resulting argv and chains stages by
//! feeding one command's stdout into the next.

pub mod config;
pub mod pipe;
pub mod quote;
pub mod tokenizer;
pub mod types;

pub use config::Config;
pub use pipe::{run_chain, CommandLine, Input, PipeOptions, ShellPipe};
pub use quote::{join, quote};
pub use tokenizer::{parse, Tokenizer};
pub use types::{PipeError, PipeResult, QuoteMark, TokenError, TokenResult};

#[cfg(test)]
mod tests;
