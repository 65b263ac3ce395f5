use crate::error::CodeError;
use serde::Serialize;
use std::fmt::Display;

/// Digits, then upper-case, then lower-case letters.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = BASE62_ALPHABET.len() as u64;

/// The fixed number of characters every short code has.
///
/// Restricted to `6..=8` so the code space is at least `62^6` and a full
/// short URL stays predictably short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeLength(usize);

impl CodeLength {
    pub const MIN: usize = 6;
    pub const MAX: usize = 8;

    pub fn new(length: usize) -> Result<Self, CodeError> {
        if !(Self::MIN..=Self::MAX).contains(&length) {
            return Err(CodeError::UnsupportedLength {
                length,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(length))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of distinct codes of this length, `62^length`.
    pub fn space(self) -> u64 {
        BASE.pow(self.0 as u32)
    }
}

impl Default for CodeLength {
    fn default() -> Self {
        Self(7)
    }
}

impl Display for CodeLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated short code: exactly [`CodeLength`] base62 characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Validates untrusted input against the alphabet and the expected length.
    pub fn parse(code: &str, length: CodeLength) -> Result<Self, CodeError> {
        if code.len() != length.get() {
            return Err(CodeError::InvalidLength {
                expected: length.get(),
                actual: code.len(),
            });
        }

        if let Some(c) = code.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CodeError::InvalidCharacter(c));
        }

        Ok(Self(code.to_owned()))
    }

    /// Encodes `value` in base62, left-padded with `'0'` to `length` characters.
    ///
    /// Values outside `[0, length.space())` are reduced modulo the space so the
    /// result always has the fixed length.
    pub fn encode(value: u64, length: CodeLength) -> Self {
        let mut remaining = value % length.space();
        let mut buf = vec![BASE62_ALPHABET[0]; length.get()];

        for slot in buf.iter_mut().rev() {
            *slot = BASE62_ALPHABET[(remaining % BASE) as usize];
            remaining /= BASE;
        }

        // every byte comes from BASE62_ALPHABET
        Self(buf.into_iter().map(char::from).collect())
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from a trusted store.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len(n: usize) -> CodeLength {
        CodeLength::new(n).unwrap()
    }

    #[test]
    fn alphabet_is_62_unique_characters() {
        let unique: std::collections::HashSet<_> = BASE62_ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
        assert!(BASE62_ALPHABET.iter().all(u8::is_ascii_alphanumeric));
    }

    #[test]
    fn code_length_bounds() {
        assert!(CodeLength::new(5).is_err());
        assert!(CodeLength::new(6).is_ok());
        assert!(CodeLength::new(8).is_ok());
        assert!(matches!(
            CodeLength::new(9),
            Err(CodeError::UnsupportedLength { length: 9, .. })
        ));
        assert_eq!(CodeLength::default().get(), 7);
    }

    #[test]
    fn space_is_power_of_62() {
        assert_eq!(len(6).space(), 56_800_235_584);
        assert_eq!(len(8).space(), 218_340_105_584_896);
    }

    #[test]
    fn parse_accepts_valid_codes() {
        assert_eq!(ShortCode::parse("aZ3kT9", len(6)).unwrap().as_str(), "aZ3kT9");
        assert!(ShortCode::parse("0000000", len(7)).is_ok());
        assert!(ShortCode::parse("zzzzzzzz", len(8)).is_ok());
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            ShortCode::parse("!!!", len(6)),
            Err(CodeError::InvalidLength {
                expected: 6,
                actual: 3
            })
        );
        assert!(ShortCode::parse("abcdefg", len(6)).is_err());
        assert!(ShortCode::parse("", len(6)).is_err());
    }

    #[test]
    fn parse_rejects_characters_outside_alphabet() {
        assert_eq!(
            ShortCode::parse("abc-ef", len(6)),
            Err(CodeError::InvalidCharacter('-'))
        );
        assert!(ShortCode::parse("abc_ef", len(6)).is_err());
        assert!(ShortCode::parse("abc ef", len(6)).is_err());
        // six bytes, but 'é' is not in the alphabet
        assert_eq!(
            ShortCode::parse("abcdé", len(6)),
            Err(CodeError::InvalidCharacter('é'))
        );
    }

    #[test]
    fn encode_pads_to_fixed_length() {
        assert_eq!(ShortCode::encode(0, len(6)).as_str(), "000000");
        assert_eq!(ShortCode::encode(61, len(6)).as_str(), "00000z");
        assert_eq!(ShortCode::encode(62, len(6)).as_str(), "000010");
        assert_eq!(ShortCode::encode(len(6).space() - 1, len(6)).as_str(), "zzzzzz");
    }

    #[test]
    fn encode_wraps_values_outside_the_space() {
        let space = len(6).space();
        assert_eq!(ShortCode::encode(space, len(6)), ShortCode::encode(0, len(6)));
        assert_eq!(ShortCode::encode(u64::MAX, len(8)).as_str().len(), 8);
    }

    #[test]
    fn encoded_codes_parse_back() {
        for value in [0, 1, 12_345, 987_654_321] {
            let code = ShortCode::encode(value, len(7));
            assert_eq!(ShortCode::parse(code.as_str(), len(7)).unwrap(), code);
        }
    }

    #[test]
    fn to_url_joins_base() {
        let code = ShortCode::parse("abc123", len(6)).unwrap();
        assert_eq!(code.to_url("https://sn.ip"), "https://sn.ip/abc123");
        assert_eq!(code.to_url("https://sn.ip/"), "https://sn.ip/abc123");
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = ShortCode::new_unchecked("abc123");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abc123\"");
    }
}
