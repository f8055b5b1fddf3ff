//! ISO-4217 alphabetic currency codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MoneyError;

/// Length of an ISO-4217 alphabetic code.
pub const CURRENCY_CODE_LEN: usize = 3;

/// Three upper-case ASCII letters, e.g. `USD`.
///
/// Validation only checks the shape of the code; whether a code is
/// assigned by ISO is left to the application.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode([u8; CURRENCY_CODE_LEN]);

impl CurrencyCode {
    /// Parse a currency code.
    ///
    /// # Errors
    /// Returns `MoneyError::InvalidCurrency` unless `code` is exactly three
    /// upper-case ASCII letters.
    pub fn parse(code: &str) -> Result<Self, MoneyError> {
        let bytes: [u8; CURRENCY_CODE_LEN] = code
            .as_bytes()
            .try_into()
            .map_err(|_| MoneyError::InvalidCurrency(code.to_owned()))?;
        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(MoneyError::InvalidCurrency(code.to_owned()));
        }
        Ok(Self(bytes))
    }

    /// Parse a code read back from a `CHAR(n)` column, which may be blank-padded.
    ///
    /// # Errors
    /// Same as [`Self::parse`].
    pub fn parse_padded(raw: &str) -> Result<Self, MoneyError> {
        Self::parse(raw.trim_end())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII upper-case letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for CurrencyCode {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = MoneyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_codes() {
        let usd = CurrencyCode::parse("USD").unwrap();
        assert_eq!(usd.as_str(), "USD");
        assert_eq!(usd.to_string(), "USD");
        assert_eq!("CZK".parse::<CurrencyCode>().unwrap().as_str(), "CZK");
    }

    #[test]
    fn rejects_malformed_codes() {
        for bad in ["", "US", "USDX", "usd", "U$D", "\u{dc}SD"] {
            assert!(
                matches!(CurrencyCode::parse(bad), Err(MoneyError::InvalidCurrency(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn padded_codes_are_trimmed() {
        assert_eq!(CurrencyCode::parse_padded("EUR  ").unwrap().as_str(), "EUR");
        assert!(CurrencyCode::parse_padded("  EUR").is_err());
        assert!(CurrencyCode::parse_padded("").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let eur = CurrencyCode::parse("EUR").unwrap();
        let json = serde_json::to_string(&eur).unwrap();
        assert_eq!(json, "\"EUR\"");
        let back: CurrencyCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, eur);
        assert!(serde_json::from_str::<CurrencyCode>("\"eur\"").is_err());
    }
}
