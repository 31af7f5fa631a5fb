//! Line tokenizer: trailing redirection split plus quote-aware word splitting.
//!
//! Only one redirection is recognized, and it is always the last `>>` or `>`
//! on the line. Quotes are `"` only; there are no backslash escapes and no
//! single quotes.

use minish_types::error::ParseError;
use minish_vfs::WriteMode;

/// Output redirection parsed from the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    /// Target file name as typed (ASCII-trimmed, never empty).
    pub target: String,
    pub mode: WriteMode,
}

/// A parsed, non-empty command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Command name (never empty).
    pub name: String,
    pub args: Vec<String>,
    pub redirection: Option<Redirection>,
}

impl CommandLine {
    /// Arguments as string slices, the shape commands receive them in.
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

/// Parse one input line.
///
/// Returns `Ok(None)` for a blank line (nothing to dispatch).
pub fn parse_line(line: &str) -> Result<Option<CommandLine>, ParseError> {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (command_part, redirection) = split_redirect(trimmed)?;

    let mut tokens = tokenize(command_part)?.into_iter();
    let Some(name) = tokens.next() else {
        return Ok(None);
    };
    Ok(Some(CommandLine {
        name,
        args: tokens.collect(),
        redirection,
    }))
}

/// Split off a trailing `>> target` or `> target`.
///
/// `>>` is searched first. A run such as `>>>` is read as `>>` followed by a
/// target that starts with `>`.
fn split_redirect(line: &str) -> Result<(&str, Option<Redirection>), ParseError> {
    let (pos, op_len, mode) = if let Some(mut pos) = line.rfind(">>") {
        while pos > 0 && line.as_bytes()[pos - 1] == b'>' {
            pos -= 1;
        }
        (pos, 2, WriteMode::Append)
    } else if let Some(pos) = line.rfind('>') {
        (pos, 1, WriteMode::Truncate)
    } else {
        return Ok((line, None));
    };

    let command_part = &line[..pos];
    let target = line[pos + op_len..].trim_ascii();
    if target.is_empty() {
        return Err(ParseError::MissingTarget);
    }
    if command_part.trim_ascii().is_empty() {
        return Err(ParseError::InvalidSyntax);
    }
    Ok((
        command_part,
        Some(Redirection {
            target: target.to_string(),
            mode,
        }),
    ))
}

/// Split a command string into words.
///
/// A `"` toggles quoting and is dropped. Spaces outside quotes separate words
/// (runs collapse); inside quotes they are kept. Empty words are dropped.
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in input.chars() {
        match ch {
            '"' => in_quote = !in_quote,
            ' ' if !in_quote => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            _ => current.push(ch),
        }
    }

    if in_quote {
        return Err(ParseError::UnmatchedQuote);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
