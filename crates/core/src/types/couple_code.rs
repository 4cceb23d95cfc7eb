//! Couple code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CoupleCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CoupleCodeError {
    /// The input string is empty (after trimming).
    #[error("couple code cannot be empty")]
    Empty,
    /// The input has the wrong number of characters.
    #[error("couple code must be exactly {expected} characters, got {actual}")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a character outside `A-Z0-9`.
    #[error("couple code may only contain letters A-Z and digits 0-9, found {found:?}")]
    InvalidCharacter {
        /// First offending character.
        found: char,
    },
}

/// The shared code that links two partners.
///
/// A couple code is the sole tenancy key for every shared resource: both
/// partners store the same code, and every scoped request to the backend
/// carries it. Codes are compared and transmitted in canonical form, so
/// [`CoupleCode::parse`] normalizes case before validating.
///
/// ## Constraints
///
/// - Exactly 6 characters
/// - Uppercase letters and digits only (lowercase input is accepted and
///   normalized)
///
/// ## Examples
///
/// ```
/// use tandem_core::CoupleCode;
///
/// // A partner typing in lowercase still joins the same couple.
/// let code = CoupleCode::parse("7k2xq9").unwrap();
/// assert_eq!(code.as_str(), "7K2XQ9");
///
/// assert!(CoupleCode::parse("").is_err());        // empty
/// assert!(CoupleCode::parse("ABC12").is_err());   // too short
/// assert!(CoupleCode::parse("ABC-123").is_err()); // wrong length and charset
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CoupleCode(String);

impl CoupleCode {
    /// Exact length of every couple code.
    pub const LENGTH: usize = 6;

    /// The characters codes are generated from.
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Parse a `CoupleCode` from a string, normalizing to uppercase.
    ///
    /// Surrounding whitespace is trimmed first so pasted codes survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Is not exactly 6 characters
    /// - Contains a character outside `A-Z0-9`
    pub fn parse(s: &str) -> Result<Self, CoupleCodeError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(CoupleCodeError::Empty);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let actual = normalized.chars().count();

        if actual != Self::LENGTH {
            return Err(CoupleCodeError::WrongLength {
                expected: Self::LENGTH,
                actual,
            });
        }

        if let Some(found) = normalized
            .chars()
            .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit())
        {
            return Err(CoupleCodeError::InvalidCharacter { found });
        }

        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CoupleCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CoupleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CoupleCode {
    type Err = CoupleCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CoupleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
