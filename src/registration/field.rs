//! Registration field state machine — tracks which field is being collected.

use serde::{Deserialize, Serialize};

/// The fields collected during registration, in order.
///
/// Progresses linearly: Name → Username → Password → Workplace → Completed.
/// `Completed` is the terminal marker; progress never moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Username,
    Password,
    Workplace,
    Completed,
}

impl Field {
    /// The four collectable fields, in collection order.
    pub const ORDER: [Field; 4] = [
        Field::Name,
        Field::Username,
        Field::Password,
        Field::Workplace,
    ];

    /// Get the next field in the linear progression, if any.
    pub fn next(&self) -> Option<Field> {
        use Field::*;
        match self {
            Name => Some(Username),
            Username => Some(Password),
            Password => Some(Workplace),
            Workplace => Some(Completed),
            Completed => None,
        }
    }

    /// Whether this is the terminal marker (all fields collected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Position in the fixed order, for forward-only assertions.
    pub fn position(&self) -> usize {
        use Field::*;
        match self {
            Name => 0,
            Username => 1,
            Password => 2,
            Workplace => 3,
            Completed => 4,
        }
    }

    /// The JSON key this field uses in the LLM contract and API payloads.
    pub fn key(&self) -> &'static str {
        use Field::*;
        match self {
            Name => "name",
            Username => "username",
            Password => "password",
            Workplace => "workplace",
            Completed => "completed",
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::Name
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_all_fields() {
        use Field::*;
        let expected = [Username, Password, Workplace, Completed];
        let mut current = Name;
        for expected_next in expected {
            let next = current.next().unwrap();
            assert_eq!(next, expected_next);
            current = next;
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn progression_is_forward_only() {
        let mut current = Field::default();
        let mut last_position = current.position();
        while let Some(next) = current.next() {
            assert!(next.position() > last_position);
            last_position = next.position();
            current = next;
        }
        assert!(current.is_terminal());
    }

    #[test]
    fn is_terminal() {
        assert!(Field::Completed.is_terminal());
        for field in Field::ORDER {
            assert!(!field.is_terminal());
        }
    }

    #[test]
    fn display_matches_serde() {
        use Field::*;
        for field in [Name, Username, Password, Workplace, Completed] {
            let display = format!("{field}");
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn default_is_first_field() {
        assert_eq!(Field::default(), Field::Name);
        assert_eq!(Field::ORDER[0], Field::Name);
    }
}
