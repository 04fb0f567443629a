use thiserror::Error;

use crate::model::task::NewTask;
use crate::time::parse_deadline;

/// Keys understood by the creation form. `due` is a short alias of `deadline`.
pub const FORM_KEYS: [&str; 4] = ["description", "deadline", "duration", "due"];

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Unknown key: '{0}'")]
    UnknownKey(String),
    #[error("Ambiguous key: '{key}' matches {matches:?}")]
    AmbiguousKey { key: String, matches: Vec<String> },
    #[error("Invalid deadline '{input}': {reason}")]
    InvalidDeadline { input: String, reason: String },
}

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    /// Expanded keys with their raw values, in the order they were typed.
    pub metadata: Vec<(String, String)>,
}

/// Splits words into title and `key:value` fields.
///
/// A word is a field only when its key expands to one of `keys`; anything
/// else with a colon (`10:30`, `Re:`) stays part of the title. An ambiguous
/// key is still an error.
pub fn parse_args(args: &[String], keys: &[&str]) -> Result<ParsedInput, FormError> {
    let mut name_parts = Vec::new();
    let mut metadata = Vec::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                match expand_key(key, keys) {
                    Ok(key) => {
                        metadata.push((key, value.to_string()));
                        continue;
                    }
                    Err(FormError::UnknownKey(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        name_parts.push(arg.as_str());
    }

    Ok(ParsedInput {
        name: name_parts.join(" "),
        metadata,
    })
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, FormError> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(FormError::UnknownKey(key.to_string())),
        _ => Err(FormError::AmbiguousKey {
            key: key.to_string(),
            matches: matches.into_iter().map(String::from).collect(),
        }),
    }
}

/// Builds the fields of a new task from form words such as
/// `Buy milk desc:two_litres due:tom dur:15m`.
///
/// This is the only place a title is checked. Underscores in values stand
/// for spaces. A repeated field keeps its last value.
pub fn parse_form(args: &[String]) -> Result<NewTask, FormError> {
    let parsed = parse_args(args, &FORM_KEYS)?;

    let title = parsed.name.trim();
    if title.is_empty() {
        return Err(FormError::EmptyTitle);
    }
    let mut draft = NewTask::new(title);

    for (key, value) in parsed.metadata {
        let value = value.replace('_', " ").trim().to_string();
        match key.as_str() {
            "description" => draft.description = value,
            "duration" => draft.duration = value,
            "deadline" | "due" => {
                draft.deadline = if value.is_empty() {
                    String::new()
                } else {
                    parse_deadline(&value).map_err(|e| FormError::InvalidDeadline {
                        input: value.clone(),
                        reason: e.to_string(),
                    })?
                };
            }
            _ => {}
        }
    }

    Ok(draft)
}

/// Splits a single form line on whitespace and parses it.
pub fn parse_form_line(line: &str) -> Result<NewTask, FormError> {
    let args: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
    parse_form(&args)
}
