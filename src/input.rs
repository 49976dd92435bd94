//! Validation of raw user input before it reaches the ledger.

use crate::core::EntryKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The description is empty or whitespace only.
    EmptyDescription,
    /// The value is not a finite number.
    InvalidValue(String),
    /// The value is zero or negative.
    NonPositiveValue,
    /// The type tag is neither income nor expense.
    UnknownKind(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::EmptyDescription => write!(f, "description must not be empty"),
            InputError::InvalidValue(v) => write!(f, "value is not a number: {v}"),
            InputError::NonPositiveValue => write!(f, "value must be positive"),
            InputError::UnknownKind(t) => write!(f, "unknown type `{t}`, expected inc or exp"),
        }
    }
}

impl std::error::Error for InputError {}

/// A validated `(type, description, value)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub kind: EntryKind,
    pub description: String,
    pub value: f64,
}

impl Submission {
    /// Validates raw field contents.
    ///
    /// The description is kept as typed, surrounding whitespace included.
    pub fn parse(tag: &str, description: &str, value: &str) -> Result<Self, InputError> {
        let kind = tag
            .parse::<EntryKind>()
            .map_err(|_| InputError::UnknownKind(tag.to_string()))?;
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| InputError::InvalidValue(value.to_string()))?;
        Self::new(kind, description, value)
    }

    /// Validates an already typed triple.
    pub fn new(kind: EntryKind, description: &str, value: f64) -> Result<Self, InputError> {
        if description.trim().is_empty() {
            return Err(InputError::EmptyDescription);
        }
        if !value.is_finite() {
            return Err(InputError::InvalidValue(value.to_string()));
        }
        if value <= 0.0 {
            return Err(InputError::NonPositiveValue);
        }
        Ok(Self {
            kind,
            description: description.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_triple() {
        let s = Submission::parse("exp", "Rent", " 25.50 ").unwrap();
        assert_eq!(s.kind, EntryKind::Expense);
        assert_eq!(s.description, "Rent");
        assert_eq!(s.value, 25.5);
    }

    #[test]
    fn rejects_blank_description() {
        assert_eq!(
            Submission::parse("inc", "   ", "10"),
            Err(InputError::EmptyDescription)
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Submission::parse("inc", "Salary", "ten"),
            Err(InputError::InvalidValue(_))
        ));
        assert!(matches!(
            Submission::parse("inc", "Salary", "NaN"),
            Err(InputError::InvalidValue(_))
        ));
        assert!(matches!(
            Submission::parse("inc", "Salary", "inf"),
            Err(InputError::InvalidValue(_))
        ));
        assert_eq!(
            Submission::parse("inc", "Salary", "0"),
            Err(InputError::NonPositiveValue)
        );
        assert_eq!(
            Submission::parse("exp", "Refund", "-3"),
            Err(InputError::NonPositiveValue)
        );
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            Submission::parse("sav", "Piggy", "1"),
            Err(InputError::UnknownKind("sav".into()))
        );
    }
}
