//! Token grammar shared by the alignment parsers.
//!
//! Two token classes make up every alignment line:
//! - a *name* token: ASCII letters, digits and a fixed punctuation set,
//!   at most [`MAX_NAME_LEN`] characters, never containing whitespace
//! - a *base* token: ASCII letters plus the gap/ambiguity symbols `?`, `.`
//!   and `-`, uppercased on capture
//!
//! The scanners work on a single line and report failures with a 1-based
//! line and column, together with the offending line for context.

use thiserror::Error;

/// Longest accepted species name.
pub const MAX_NAME_LEN: usize = 100;

/// Punctuation allowed in species names in addition to letters and digits.
const NAME_PUNCTUATION: &str = "!#$%&'*+-./;<=>?@[\\]^_`{|}~";

/// A position-tagged failure to match the token grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct GrammarError {
    /// 1-based line number
    pub line: usize,
    /// 1-based character column
    pub column: usize,
    pub message: String,
    /// The offending line (empty at end of input)
    pub context: String,
}

impl GrammarError {
    /// Creates an error pointing at byte `offset` of `line`.
    pub fn at(line_no: usize, line: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(line.len());
        Self {
            line: line_no,
            column: line[..offset].chars().count() + 1,
            message: message.into(),
            context: line.to_string(),
        }
    }

    /// Creates an error for input that ended while more tokens were expected.
    pub fn end_of_input(line_count: usize, message: impl Into<String>) -> Self {
        Self {
            line: line_count + 1,
            column: 1,
            message: format!("{}, found end of input", message.into()),
            context: String::new(),
        }
    }
}

/// Character set accepted in a species name.
///
/// FASTA names may not use `<`, `=` or `>` since `>` starts a record there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameClass {
    Phylip,
    Fasta,
}

impl NameClass {
    /// Returns true if `c` may appear in a species name.
    pub fn accepts(self, c: char) -> bool {
        if c.is_ascii_alphanumeric() {
            return true;
        }
        match self {
            NameClass::Phylip => NAME_PUNCTUATION.contains(c),
            NameClass::Fasta => NAME_PUNCTUATION.contains(c) && !matches!(c, '<' | '=' | '>'),
        }
    }
}

/// Checks if a character is a valid base symbol.
pub fn is_base_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '?' | '.' | '-')
}

/// Token separator within a line. Newlines never separate tokens.
fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Returns the offset of the first non-separator character at or after `start`.
pub fn skip_separators(line: &str, start: usize) -> usize {
    line[start..]
        .find(|c: char| !is_separator(c))
        .map_or(line.len(), |i| start + i)
}

/// Returns true if the line holds nothing but separators.
pub fn is_blank(line: &str) -> bool {
    line.trim_matches(is_separator).is_empty()
}

/// Splits `content` into lines ending in `\n`, `\r\n` or a lone `\r`.
///
/// Like [`str::lines`], a final line ending does not start an extra line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        match rest.find(|c| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(&rest[..end]);
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + width..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

/// Returns the index of the first non-blank line at or after `start`.
pub fn skip_blank_lines(lines: &[&str], start: usize) -> usize {
    lines[start.min(lines.len())..]
        .iter()
        .position(|line| !is_blank(line))
        .map_or(lines.len(), |i| start + i)
}

/// Describes the character at `offset` for error messages.
fn describe(line: &str, offset: usize) -> String {
    match line[offset..].chars().next() {
        Some(c) => format!("'{}'", c.escape_default()),
        None => "end of line".to_string(),
    }
}

/// Scans a name token starting at byte `start` of `line`.
///
/// The token must be followed by a space, a tab or the end of the line.
/// Returns the name and the offset just past it.
pub fn scan_name<'a>(
    line: &'a str,
    line_no: usize,
    start: usize,
    class: NameClass,
) -> Result<(&'a str, usize), GrammarError> {
    let end = line[start..]
        .find(|c: char| !class.accepts(c))
        .map_or(line.len(), |i| start + i);

    if end == start {
        return Err(GrammarError::at(
            line_no,
            line,
            start,
            format!("expected a species name, found {}", describe(line, start)),
        ));
    }
    if end - start > MAX_NAME_LEN {
        return Err(GrammarError::at(
            line_no,
            line,
            start + MAX_NAME_LEN,
            format!("species name longer than {} characters", MAX_NAME_LEN),
        ));
    }
    if let Some(c) = line[end..].chars().next() {
        if !is_separator(c) {
            return Err(GrammarError::at(
                line_no,
                line,
                end,
                format!("unexpected character {} in species name", describe(line, end)),
            ));
        }
    }

    Ok((&line[start..end], end))
}

/// Scans the base token that must end `line`, starting at byte `start`.
///
/// Surrounding spaces and tabs are skipped. The token is uppercased and must
/// hold at least one base. A second token on the line is an error: it most
/// often means a species name contained whitespace.
pub fn scan_bases(line: &str, line_no: usize, start: usize) -> Result<String, GrammarError> {
    let begin = skip_separators(line, start);
    let end = line[begin..]
        .find(|c: char| !is_base_char(c))
        .map_or(line.len(), |i| begin + i);

    if end == begin {
        return Err(GrammarError::at(
            line_no,
            line,
            begin,
            format!("expected sequence data, found {}", describe(line, begin)),
        ));
    }

    let rest = skip_separators(line, end);
    if rest < line.len() {
        let message = if rest > end && line[rest..].starts_with(is_base_char) {
            "unexpected whitespace in sequence data".to_string()
        } else {
            format!("unexpected character {} in sequence data", describe(line, rest))
        };
        return Err(GrammarError::at(line_no, line, rest, message));
    }

    Ok(line[begin..end].to_ascii_uppercase())
}

/// Scans an unsigned integer after optional separators.
///
/// Returns the value and the offset just past its digits.
pub fn scan_integer(line: &str, line_no: usize, start: usize) -> Result<(usize, usize), GrammarError> {
    let start = skip_separators(line, start);
    let end = line[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(line.len(), |i| start + i);

    if end == start {
        return Err(GrammarError::at(
            line_no,
            line,
            start,
            format!("expected an integer, found {}", describe(line, start)),
        ));
    }

    let value = line[start..end].parse().map_err(|_| {
        GrammarError::at(line_no, line, start, format!("integer '{}' is out of range", &line[start..end]))
    })?;

    Ok((value, end))
}
