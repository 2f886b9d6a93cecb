use nix::sys::signal::Signal;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMark {
    Single, // '
    Double, // "
}

impl QuoteMark {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(QuoteMark::Single),
            '"' => Some(QuoteMark::Double),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            QuoteMark::Single => '\'',
            QuoteMark::Double => '"',
        }
    }

    /// Only double-quoted segments give backslash a special meaning.
    pub fn honors_escapes(self) -> bool {
        matches!(self, QuoteMark::Double)
    }
}

/// Raised when a command string cannot be split into tokens.
///
/// `position` is the character index where the failing token began and
/// `remainder` is the unparsed input from that index on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("unterminated quoted string {partial:?} == {remainder}")]
    UnterminatedQuote {
        mark: QuoteMark,
        partial: String,
        position: usize,
        remainder: String,
    },
    #[error("unterminated escape sequence == {remainder}")]
    UnterminatedEscape { position: usize, remainder: String },
}

impl TokenError {
    pub fn position(&self) -> usize {
        match self {
            TokenError::UnterminatedQuote { position, .. }
            | TokenError::UnterminatedEscape { position, .. } => *position,
        }
    }

    pub fn remainder(&self) -> &str {
        match self {
            TokenError::UnterminatedQuote { remainder, .. }
            | TokenError::UnterminatedEscape { remainder, .. } => remainder,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipeError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("empty command")]
    EmptyCommand,
    #[error("{program}: failed to spawn: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", crate::quote::join(command))]
    Io {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },
    // Display is the child's stderr, so callers can surface it as-is.
    #[error("{stderr}")]
    Status {
        command: Vec<String>,
        code: Option<i32>,
        signal: Option<Signal>,
        stderr: String,
    },
}

impl PipeError {
    /// The argv of the stage that failed, when one was built.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            PipeError::Io { command, .. } | PipeError::Status { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Process exit code for reporting this failure: the child's own code
    /// when it exited unsuccessfully, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipeError::Status { code: Some(code), .. } => (*code).clamp(1, 255) as u8,
            _ => 1,
        }
    }

    /// Exit code of a failed child, if it exited normally.
    pub fn returncode(&self) -> Option<i32> {
        match self {
            PipeError::Status { code, .. } => *code,
            _ => None,
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
pub type PipeResult<T> = Result<T, PipeError>;
