//! Validated value types shared across the explorer crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, which
/// mirrors how form input is cleaned before it reaches the stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        Self::for_field("text", input)
    }

    /// Like [`NonEmptyText::new`], but names the offending field in the error.
    pub fn for_field(field: &'static str, input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty { field });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps the trimmed string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_whitespace() {
        let text = NonEmptyText::new("  E11.9 ").expect("should accept padded text");
        assert_eq!(text.as_str(), "E11.9");
    }

    #[test]
    fn test_new_rejects_blank_input() {
        assert_eq!(
            NonEmptyText::new("   "),
            Err(TextError::Empty { field: "text" })
        );
    }

    #[test]
    fn test_for_field_names_field_in_error() {
        let err = NonEmptyText::for_field("description", "").expect_err("empty should fail");
        assert_eq!(err.to_string(), "description cannot be empty");
    }

    #[test]
    fn test_deserialize_rejects_empty_string() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());

        let ok: NonEmptyText = serde_json::from_str("\"MD\"").expect("should deserialize");
        assert_eq!(ok.as_str(), "MD");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let text = NonEmptyText::new(" Endocrine ").expect("should accept padded text");
        assert_eq!(
            serde_json::to_string(&text).expect("should serialize"),
            "\"Endocrine\""
        );
        assert_eq!(format!("{text:>10}"), " Endocrine");
    }
}
