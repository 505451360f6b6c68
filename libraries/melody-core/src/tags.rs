//! Genre and artist name normalization.
//!
//! Tag lists reach the API either as a JSON array, as a string holding a
//! JSON array (multipart form fields), or as a bare single name. Everything
//! funnels through [`TagInput::into_names`] and then [`normalize`], which
//! validates every name and drops exact duplicates while keeping the order
//! of first occurrence.

use crate::error::{MelodyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw tag list as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    List(Vec<String>),
    Text(String),
}

impl TagInput {
    /// Decode into the submitted names, without validation.
    ///
    /// Text is tried as a JSON array of strings first; anything else is
    /// taken verbatim as a single name.
    pub fn into_names(self) -> Vec<String> {
        match self {
            TagInput::List(names) => names,
            TagInput::Text(text) => match serde_json::from_str::<Vec<String>>(&text) {
                Ok(names) => names,
                Err(_) => vec![text],
            },
        }
    }
}

impl From<&str> for TagInput {
    fn from(text: &str) -> Self {
        TagInput::Text(text.to_string())
    }
}

impl From<Vec<String>> for TagInput {
    fn from(names: Vec<String>) -> Self {
        TagInput::List(names)
    }
}

/// Decode, validate and deduplicate a tag list. Absent input yields an empty list.
pub fn normalize(input: Option<TagInput>) -> Result<Vec<String>> {
    let names = input.map(TagInput::into_names).unwrap_or_default();
    validate_names(&names)?;
    Ok(dedupe(names))
}

/// Like [`normalize`], but keeps "field omitted" distinct for partial updates
pub fn normalize_field(input: Option<TagInput>) -> Result<Option<Vec<String>>> {
    input.map(|input| normalize(Some(input))).transpose()
}

/// Reject blank names and characters outside `[A-Za-z0-9 \-',.]`
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MelodyError::invalid_name(name, "must be a non-empty string"));
    }
    if !name.chars().all(is_allowed_char) {
        return Err(MelodyError::invalid_name(
            name,
            "contains invalid characters",
        ));
    }
    Ok(())
}

pub fn validate_names(names: &[String]) -> Result<()> {
    names.iter().try_for_each(|name| validate_name(name))
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || matches!(c, '-' | '\'' | ',' | '.')
}

/// Drop exact (case-sensitive) duplicates, keeping first occurrences in order
pub fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Split a comma-separated query value (`?genres=Rock,Jazz`) into trimmed names
pub fn split_name_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_text_is_decoded_and_deduplicated() {
        let names = normalize(Some(r#"["Rock","Pop","Rock"]"#.into())).unwrap();
        assert_eq!(names, vec!["Rock", "Pop"]);
    }

    #[test]
    fn plain_text_is_a_single_name() {
        let names = normalize(Some("Hip-Hop".into())).unwrap();
        assert_eq!(names, vec!["Hip-Hop"]);
    }

    #[test]
    fn non_array_json_is_a_single_name() {
        // Valid JSON, but not an array of strings
        let names = normalize(Some("42".into())).unwrap();
        assert_eq!(names, vec!["42"]);

        let err = normalize(Some(r#"{"a":"b"}"#.into())).unwrap_err();
        assert!(matches!(err, MelodyError::InvalidName { .. }));
    }

    #[test]
    fn sequences_are_used_as_is() {
        let input = TagInput::List(vec!["Jazz".into(), "jazz".into(), "Jazz".into()]);
        assert_eq!(normalize(Some(input)).unwrap(), vec!["Jazz", "jazz"]);
    }

    #[test]
    fn absent_input_is_empty() {
        assert!(normalize(None).unwrap().is_empty());
        assert_eq!(normalize_field(None).unwrap(), None);
        assert_eq!(
            normalize_field(Some(TagInput::List(vec![]))).unwrap(),
            Some(vec![])
        );
    }

    #[test]
    fn punctuation_outside_the_allowed_set_is_rejected() {
        let err = normalize(Some(r#"["Rock!"]"#.into())).unwrap_err();
        assert!(matches!(err, MelodyError::InvalidName { ref name, .. } if name == "Rock!"));

        assert!(validate_name("Guns N' Roses").is_ok());
        assert!(validate_name("Crosby, Stills, Nash").is_ok());
        assert!(validate_name("Dr. Dre").is_ok());
        assert!(validate_name("AC/DC").is_err());
        assert!(validate_name("Björk").is_err());
    }

    #[test]
    fn blank_names_fail_the_whole_list() {
        let input = TagInput::List(vec!["Rock".into(), "   ".into()]);
        assert!(matches!(
            normalize(Some(input)),
            Err(MelodyError::InvalidName { .. })
        ));
        assert!(normalize(Some("".into())).is_err());
    }

    #[test]
    fn untagged_deserialization_accepts_both_shapes() {
        let list: TagInput = serde_json::from_str(r#"["A","B"]"#).unwrap();
        assert_eq!(list, TagInput::List(vec!["A".into(), "B".into()]));

        let text: TagInput = serde_json::from_str(r#""A""#).unwrap();
        assert_eq!(text, TagInput::Text("A".into()));
    }

    #[test]
    fn comma_lists_are_split_and_trimmed() {
        assert_eq!(split_name_list("Rock, Jazz ,,Pop"), vec!["Rock", "Jazz", "Pop"]);
        assert!(split_name_list(" , ").is_empty());
    }
}
