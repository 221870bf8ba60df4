//! Job argument parsing for slash commands.
//!
//! Arguments arrive already split on whitespace, so a quoted job name such as
//! `"folder with space/job"` shows up as several tokens. [`parse`] stitches the
//! quoted span back together, then looks for an optional build number and any
//! trailing `key=value` build parameters.

use std::collections::BTreeMap;

use serde::Serialize;

const QUOTE: char = '"';

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArgs {
    pub job_name: String,
    pub build_number: Option<String>,
    pub parameters: BTreeMap<String, String>,
    /// Set when an opening quote was never closed and every remaining token
    /// was folded into the job name.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unterminated_quote: bool,
}

impl ParsedArgs {
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// Parses job arguments. Returns `None` only when `tokens` is empty.
///
/// Tokens that are neither a leading build number nor `key=value` pairs are
/// ignored.
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Option<ParsedArgs> {
    let (first, rest) = tokens.split_first()?;
    let first = first.as_ref();

    let Some(opened) = first.strip_prefix(QUOTE) else {
        return Some(parse_trailing(first.to_owned(), rest));
    };

    if let Some(closed) = opened.strip_suffix(QUOTE) {
        return Some(parse_trailing(closed.to_owned(), rest));
    }

    let mut parts = vec![opened];
    for (index, token) in rest.iter().enumerate() {
        let token = token.as_ref();
        if let Some(closed) = token.strip_suffix(QUOTE) {
            parts.push(closed);
            return Some(parse_trailing(parts.join(" "), &rest[index + 1..]));
        }
        parts.push(token);
    }

    Some(ParsedArgs { job_name: parts.join(" "), unterminated_quote: true, ..ParsedArgs::default() })
}

fn parse_trailing<S: AsRef<str>>(job_name: String, tokens: &[S]) -> ParsedArgs {
    let mut remaining = tokens.iter().map(AsRef::as_ref).peekable();

    let build_number =
        remaining.next_if(|token| is_build_number(token)).map(|token| token.to_owned());

    let parameters = remaining
        .filter_map(|token| token.split_once('='))
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect();

    ParsedArgs { job_name, build_number, parameters, unterminated_quote: false }
}

fn is_build_number(token: &str) -> bool {
    token.parse::<i64>().is_ok()
}

/// Splits raw command text the way the chat platform delivers it: on any run
/// of whitespace, with no quote awareness.
pub fn split_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Renders a job name so that feeding it back through [`parse`] as a single
/// token yields the same name.
pub fn quote_job_name(job_name: &str) -> String {
    if job_name.contains(char::is_whitespace) || job_name.starts_with(QUOTE) {
        format!("{QUOTE}{job_name}{QUOTE}")
    } else {
        job_name.to_owned()
    }
}
