//! Renders argument lists back into command strings that `parse` accepts.

use std::borrow::Cow;

fn needs_quoting(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\'' | '"' | '\\')
}

/// Quotes one argument so that `parse` reads it back as a single token.
///
/// Plain words are returned unchanged. Words without an apostrophe go in
/// single quotes, everything else in double quotes with `\` and `"` escaped.
pub fn quote(arg: &str) -> Cow<'_, str> {
    if arg.is_empty() {
        return Cow::Borrowed("''");
    }
    if !arg.chars().any(needs_quoting) {
        return Cow::Borrowed(arg);
    }
    if !arg.contains('\'') {
        return Cow::Owned(format!("'{arg}'"));
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Quotes every argument and joins them with single spaces.
pub fn join<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| quote(arg.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
