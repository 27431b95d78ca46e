//! Parser for the model's two-part replies.
//!
//! The format contract asks for a short conversational message followed by a
//! single JSON object on its own final line. In practice models sometimes
//! skip the message and send bare JSON, so the parser extracts the rightmost
//! brace span and synthesizes a per-field filler message when the prefix is
//! missing. The brace-scan heuristic lives behind this module so a stricter
//! extraction strategy can replace it without touching the state machine.

use serde_json::Value;

use crate::error::ParseError;

use super::field::Field;
use super::prompts::default_filler_message;
use super::session::CollectedInfo;

/// A successfully parsed reply: the text to show the user and the model's
/// belief about all four fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub display_message: String,
    pub belief: CollectedInfo,
}

const REQUIRED_KEYS: [&str; 4] = ["name", "username", "password", "workplace"];

/// Split a raw reply into display text and the trailing four-field JSON
/// object. The JSON span is the rightmost `{` through the rightmost `}`.
pub fn parse_reply(raw: &str, current_field: Field) -> Result<ParsedReply, ParseError> {
    let open = raw.rfind('{').ok_or(ParseError::MissingJson)?;
    let close = raw.rfind('}').ok_or(ParseError::MissingJson)?;
    if close < open {
        return Err(ParseError::MissingJson);
    }

    let span = &raw[open..=close];
    let value: Value = serde_json::from_str(span)?;
    let object = value.as_object().ok_or(ParseError::MissingJson)?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(ParseError::MissingKey(key));
        }
    }

    // Non-string, non-null values (numbers, nested objects) count as null.
    let field_value = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);
    let belief = CollectedInfo {
        name: field_value("name"),
        username: field_value("username"),
        password: field_value("password"),
        workplace: field_value("workplace"),
    };

    let display_message = if raw.trim_start().starts_with('{') {
        default_filler_message(current_field).to_string()
    } else {
        raw[..open].trim().to_string()
    };

    Ok(ParsedReply {
        display_message,
        belief,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_part_reply() {
        let raw = "Nice to meet you, John!\n{\"name\":\"John Smith\",\"username\":null,\"password\":null,\"workplace\":null}";
        let parsed = parse_reply(raw, Field::Name).unwrap();
        assert_eq!(parsed.display_message, "Nice to meet you, John!");
        assert_eq!(parsed.belief.name.as_deref(), Some("John Smith"));
        assert!(parsed.belief.username.is_none());
    }

    #[test]
    fn bare_json_gets_filler_message() {
        let raw = "  {\"name\":\"John\",\"username\":null,\"password\":null,\"workplace\":null}";
        let parsed = parse_reply(raw, Field::Name).unwrap();
        assert_eq!(parsed.display_message, default_filler_message(Field::Name));
        assert_eq!(parsed.belief.name.as_deref(), Some("John"));
    }

    #[test]
    fn braces_in_message_text_do_not_confuse_extraction() {
        let raw = "Use {strong} passwords with symbols like {}!\n{\"name\":\"J\",\"username\":\"j\",\"password\":null,\"workplace\":null}";
        let parsed = parse_reply(raw, Field::Password).unwrap();
        assert!(parsed.display_message.starts_with("Use {strong} passwords"));
        assert_eq!(parsed.belief.username.as_deref(), Some("j"));
    }

    #[test]
    fn no_json_is_an_error() {
        let err = parse_reply("Could you repeat that?", Field::Name).unwrap_err();
        assert!(matches!(err, ParseError::MissingJson));
    }

    #[test]
    fn closing_brace_before_opening_is_an_error() {
        let err = parse_reply("} mismatched {", Field::Name).unwrap_err();
        assert!(matches!(err, ParseError::MissingJson));
    }

    #[test]
    fn invalid_json_span_is_an_error() {
        let err = parse_reply("Here you go:\n{not json}", Field::Name).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn missing_key_is_an_error() {
        let raw = "Okay!\n{\"name\":\"J\",\"username\":null,\"password\":null}";
        let err = parse_reply(raw, Field::Name).unwrap_err();
        assert!(matches!(err, ParseError::MissingKey("workplace")));
    }

    #[test]
    fn nested_object_value_breaks_the_rightmost_span() {
        let raw = "Done.\n{\"name\":42,\"username\":null,\"password\":null,\"workplace\":{\"nested\":true}}";
        // The rightmost '{' opens the nested object, so the extracted span
        // is `{"nested":true}}` — not valid JSON. This fragility is part of
        // the documented brace-scan contract.
        let err = parse_reply(raw, Field::Name).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn numeric_value_is_treated_as_null() {
        let raw = "Done.\n{\"name\":42,\"username\":\"j\",\"password\":null,\"workplace\":null}";
        let parsed = parse_reply(raw, Field::Name).unwrap();
        assert!(parsed.belief.name.is_none());
        assert_eq!(parsed.belief.username.as_deref(), Some("j"));
    }
}
