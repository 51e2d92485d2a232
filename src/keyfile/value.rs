//! Value escaping for the desktop entry text format
//!
//! Raw values are stored exactly as written in the file. Escape sequences are
//! only interpreted when a value is read as a string or a list.

use thiserror::Error;

/// Separator for list-valued keys (`OnlyShowIn=GNOME;KDE;`)
pub const LIST_SEPARATOR: char = ';';

/// Problem decoding a raw value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("value ends with a lone backslash")]
    TrailingBackslash,
}

/// Decode a plain string value
///
/// `\;` has no meaning outside of lists and is kept as written.
pub fn unescape(raw: &str) -> Result<String, ValueError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(LIST_SEPARATOR) => {
                out.push('\\');
                out.push(LIST_SEPARATOR);
            }
            Some(escaped) => out.push(decode_escape(escaped)?),
            None => return Err(ValueError::TrailingBackslash),
        }
    }

    Ok(out)
}

/// Decode a list value, splitting on unescaped separators
///
/// A trailing separator is optional and does not produce an empty element.
pub fn split_list(raw: &str) -> Result<Vec<String>, ValueError> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            LIST_SEPARATOR => items.push(std::mem::take(&mut current)),
            '\\' => match chars.next() {
                Some(LIST_SEPARATOR) => current.push(LIST_SEPARATOR),
                Some(escaped) => current.push(decode_escape(escaped)?),
                None => return Err(ValueError::TrailingBackslash),
            },
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        items.push(current);
    }

    Ok(items)
}

/// Encode a string so that `unescape` returns it unchanged
///
/// Leading whitespace is trimmed by the parser, so a leading space is written
/// as `\s`. Quote characters are left alone.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for (i, c) in value.chars().enumerate() {
        match c {
            ' ' if i == 0 => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }

    out
}

fn decode_escape(c: char) -> Result<char, ValueError> {
    match c {
        's' => Ok(' '),
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '\\' => Ok('\\'),
        other => Err(ValueError::InvalidEscape(other)),
    }
}
