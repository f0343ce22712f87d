//! Free-text canonicalization
//!
//! Movie titles, cast lists and categories are stored in title case so that
//! "the matrix", "THE MATRIX" and "The Matrix" all persist identically.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Convert a string to title case
///
/// The first alphanumeric character of each word is upper-cased and every
/// following character of the word is lower-cased. Anything that is not
/// alphanumeric (or `_`) separates words and is copied through unchanged.
///
/// Characters whose case mapping expands to more than one character (`ß`,
/// `İ`, ...) are left as they are, which keeps the transform idempotent.
///
/// ```
/// use oms_common::canonical::title_case;
///
/// assert_eq!(title_case("leonardo dicaprio"), "Leonardo Dicaprio");
/// assert_eq!(title_case("sci-FI"), "Sci-Fi");
/// ```
pub fn title_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.chars() {
        if is_word_char(c) {
            let mapped = if in_word {
                single_char_mapping(c, c.to_lowercase())
            } else {
                single_char_mapping(c, c.to_uppercase())
            };
            output.push(mapped);
            in_word = true;
        } else {
            output.push(c);
            in_word = false;
        }
    }

    output
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn single_char_mapping(original: char, mut mapping: impl Iterator<Item = char>) -> char {
    match (mapping.next(), mapping.next()) {
        (Some(mapped), None) => mapped,
        _ => original,
    }
}

/// Title-case every string value of a field map
///
/// Null values pass through untouched. Any other non-string value fails with
/// [`Error::TypeMismatch`] naming the offending field.
pub fn canonicalize_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    fields
        .iter()
        .map(|(key, value)| match value {
            Value::Null => Ok((key.clone(), Value::Null)),
            Value::String(s) => Ok((key.clone(), Value::String(title_case(s)))),
            other => Err(Error::TypeMismatch {
                field: key.clone(),
                found: json_type_name(other),
            }),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
