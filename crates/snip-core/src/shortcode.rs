use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// Number of characters in every short code.
pub const CODE_LENGTH: usize = 4;

/// The 52 symbols a short code is drawn from: `A-Z` followed by `a-z`.
pub const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A validated short code identifier for a shortened URL.
///
/// Short codes are exactly [`CODE_LENGTH`] ASCII letters and are
/// case-sensitive: `XyAB` and `xyab` are different codes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators that draw from [`ALPHABET`]).
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code.as_ref()))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() != CODE_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be {}, got {}",
                CODE_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only ASCII letters: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        ShortCode::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("abcd").is_ok());
        assert!(ShortCode::new("XyAB").is_ok());
        assert!(ShortCode::new("ZZZZ").is_ok());
    }

    #[test]
    fn wrong_length() {
        assert!(ShortCode::new("abc").is_err());
        assert!(ShortCode::new("abcde").is_err());
        assert!(ShortCode::new("").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("ab1d").is_err());
        assert!(ShortCode::new("ab-d").is_err());
        assert!(ShortCode::new("ab d").is_err());
        assert!(ShortCode::new("abçd").is_err());
    }

    #[test]
    fn case_sensitive() {
        let upper = ShortCode::new("ABCD").unwrap();
        let lower = ShortCode::new("abcd").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn alphabet_is_letters_only() {
        assert_eq!(ALPHABET.len(), 52);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphabetic));
    }

    #[test]
    fn to_url() {
        let code = ShortCode::new("XyAB").unwrap();
        assert_eq!(code.to_url("https://sn.ip"), "https://sn.ip/XyAB");
        assert_eq!(code.to_url("https://sn.ip/"), "https://sn.ip/XyAB");
    }

    #[test]
    fn deserialize_validates() {
        let code: ShortCode = serde_json::from_str("\"XyAB\"").unwrap();
        assert_eq!(code.as_str(), "XyAB");
        assert!(serde_json::from_str::<ShortCode>("\"toolong\"").is_err());
    }
}
