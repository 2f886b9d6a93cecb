use crate::types::{QuoteMark, TokenError, TokenResult};

const ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Escaping, // previous char was an unconsumed backslash
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

fn remainder_from(chars: &[char], pos: usize) -> String {
    chars[pos..].iter().collect()
}

/// Splits a command string into argument tokens.
///
/// Handles whitespace splitting, single and double quotes, backslash escapes
/// and glued fragments (`"like"'this'` becomes `likethis`). No globbing and
/// no variable substitution is performed.
///
/// ```
/// let args = shellpipe::parse(r#"git commit -m "it's done""#).unwrap();
/// assert_eq!(args, vec!["git", "commit", "-m", "it's done"]);
/// ```
pub fn parse(command: &str) -> TokenResult<Vec<String>> {
    let tokens = Tokenizer::new(command).collect::<TokenResult<Vec<_>>>()?;
    tracing::debug!(count = tokens.len(), "tokenized command");
    Ok(tokens)
}

/// Streaming view over the tokens of one command string.
///
/// Yields at most one error, after which iteration ends.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    failed: bool,
}

impl Tokenizer {
    pub fn new(command: &str) -> Self {
        Self {
            chars: command.chars().collect(),
            pos: 0,
            failed: false,
        }
    }

    /// Character index of the next unread input.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> TokenResult<Option<String>> {
        if self.failed {
            return Ok(None);
        }
        match take_token(&self.chars, self.pos) {
            Ok(Some((token, next))) => {
                self.pos = next;
                Ok(Some(token))
            }
            Ok(None) => {
                self.pos = self.chars.len();
                Ok(None)
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }
}

impl Iterator for Tokenizer {
    type Item = TokenResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Extracts the token starting at or after `pos`.
///
/// Returns the token and the position right after it, or `None` when only
/// separators remain. The separator that ends a token is left unconsumed.
pub fn take_token(chars: &[char], pos: usize) -> TokenResult<Option<(String, usize)>> {
    let mut token = String::new();
    // A quoted segment starts a token even when it adds no characters.
    let mut started = false;
    let mut state = ScanState::Scanning;
    let mut i = pos;

    while let Some(&c) = chars.get(i) {
        match state {
            ScanState::Escaping => {
                token.push(c);
                state = ScanState::Scanning;
                i += 1;
            }
            ScanState::Scanning => {
                if c == ESCAPE {
                    started = true;
                    state = ScanState::Escaping;
                    i += 1;
                } else if let Some(mark) = QuoteMark::from_char(c) {
                    started = true;
                    i = take_quoted(chars, pos, i + 1, mark, &mut token)?;
                } else if is_separator(c) {
                    if started {
                        return Ok(Some((token, i)));
                    }
                    i += 1;
                } else {
                    started = true;
                    token.push(c);
                    i += 1;
                }
            }
        }
    }

    if state == ScanState::Escaping {
        return Err(TokenError::UnterminatedEscape {
            position: token_start(chars, pos),
            remainder: remainder_from(chars, token_start(chars, pos)),
        });
    }

    Ok(started.then_some((token, i)))
}

/// Reads a quoted segment whose opening mark sits just before `pos`, appending
/// its content to `token`. Returns the position after the closing mark.
fn take_quoted(
    chars: &[char],
    token_pos: usize,
    pos: usize,
    mark: QuoteMark,
    token: &mut String,
) -> TokenResult<usize> {
    let mut segment = String::new();
    let mut state = ScanState::Scanning;
    let mut i = pos;

    while let Some(&c) = chars.get(i) {
        i += 1;
        match state {
            ScanState::Escaping => {
                segment.push(c);
                state = ScanState::Scanning;
            }
            ScanState::Scanning if c == ESCAPE && mark.honors_escapes() => {
                state = ScanState::Escaping;
            }
            ScanState::Scanning if c == mark.as_char() => {
                token.push_str(&segment);
                return Ok(i);
            }
            ScanState::Scanning => segment.push(c),
        }
    }

    let start = token_start(chars, token_pos);
    Err(TokenError::UnterminatedQuote {
        mark,
        partial: segment,
        position: start,
        remainder: remainder_from(chars, start),
    })
}

// Skips the separators `take_token` discarded before the failing word.
fn token_start(chars: &[char], pos: usize) -> usize {
    chars[pos..]
        .iter()
        .position(|&c| !is_separator(c))
        .map_or(chars.len(), |offset| pos + offset)
}
