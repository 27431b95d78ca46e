//! Field normalizer — strips conversational filler from raw field values.
//!
//! Users answer "what's your name?" with things like "my name is john
//! smith." rather than the bare value. Each free-text field gets a small,
//! fixed set of leading filler phrases stripped before the value is
//! accepted. Normalization is pure, deterministic, and idempotent; an empty
//! result means the input was pure filler and must not count as a value.

use std::sync::LazyLock;

use regex::Regex;

use super::field::Field;

static NAME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(my name is|i am|i'm|it's|its|\s)+").unwrap());
static USERNAME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(my username is|username|\s)+").unwrap());
static USERNAME_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]").unwrap());
static WORKPLACE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(i work at|i study at|i'm at|i am at|workplace is|school is|\s)+").unwrap()
});
static TRAILING_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.,!]$").unwrap());

/// Clean a raw user-supplied value for a field.
///
/// Only the three free-text fields are normalized. Passwords are taken
/// verbatim (they are length-checked, never rewritten), and the terminal
/// marker has no value to clean.
pub fn normalize(field: Field, raw: &str) -> String {
    let value = raw.trim();

    match field {
        Field::Name => {
            let value = NAME_PREFIX.replace(value, "");
            let value = TRAILING_PUNCT.replace(&value, "");
            title_case(&value)
        }
        Field::Username => {
            let value = USERNAME_PREFIX.replace(value, "");
            USERNAME_CHARS.replace_all(value.trim(), "").to_lowercase()
        }
        Field::Workplace => {
            let value = WORKPLACE_PREFIX.replace(value, "");
            let value = TRAILING_PUNCT.replace(&value, "");
            value.trim().to_string()
        }
        Field::Password | Field::Completed => value.to_string(),
    }
}

/// Uppercase the first letter of each whitespace-separated token, lowercase
/// the rest.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
