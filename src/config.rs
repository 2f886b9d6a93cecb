use std::env;
use std::path::PathBuf;

use crate::pipe::PipeOptions;

pub const PROMPT_VAR: &str = "SHELLPIPE_PROMPT";
pub const LOG_VAR: &str = "SHELLPIPE_LOG";
pub const NO_CHECK_VAR: &str = "SHELLPIPE_NO_CHECK";
pub const HISTORY_VAR: &str = "SHELLPIPE_HISTORY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    pub check_status: bool,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: String::from("$ "),
            log_filter: String::from("warn"),
            check_status: true,
            history_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any variable source; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(prompt) = lookup(PROMPT_VAR) {
            config.prompt = prompt;
        }
        if let Some(filter) = lookup(LOG_VAR).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(flag) = lookup(NO_CHECK_VAR) {
            config.check_status = !is_truthy(&flag);
        }
        config.history_file = lookup(HISTORY_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        config
    }

    pub fn apply(&self, mut options: PipeOptions) -> PipeOptions {
        options.check_status = self.check_status;
        options
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}
