//! Phone number normalization.
//!
//! A best-effort heuristic for one regional numbering convention (trunk
//! prefix `0`, ten-digit national numbers), not a general number parser.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Calling code used when none is configured.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// A validated international calling code such as `+91`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY_CODE.to_string())
    }
}

impl FromStr for CountryCode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = s
            .strip_prefix('+')
            .map(|digits| {
                (1..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
            })
            .unwrap_or(false);

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(DispatchError::InvalidCountryCode(s.to_string()))
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps raw phone strings to a dialable `+`-prefixed form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneNormalizer {
    country_code: CountryCode,
}

impl PhoneNormalizer {
    pub fn new(country_code: CountryCode) -> Self {
        Self { country_code }
    }

    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }

    /// Normalize a phone number. Total: the result always starts with `+`.
    ///
    /// Rules, first match wins:
    /// 1. leading `0` is replaced by the country code;
    /// 2. exactly ten digits get the country code prepended;
    /// 3. anything else without a leading `+` gets one;
    /// 4. otherwise the number is returned unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let phone = raw.trim();

        if let Some(national) = phone.strip_prefix('0') {
            format!("{}{}", self.country_code, national)
        } else if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
            format!("{}{}", self.country_code, phone)
        } else if !phone.starts_with('+') {
            format!("+{}", phone)
        } else {
            phone.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> PhoneNormalizer {
        PhoneNormalizer::default()
    }

    #[test]
    fn test_leading_zero_is_replaced() {
        assert_eq!(normalizer().normalize("0123456789"), "+91123456789");
        assert_eq!(normalizer().normalize("09876543210"), "+919876543210");
    }

    #[test]
    fn test_ten_digits_get_country_code() {
        assert_eq!(normalizer().normalize("9876543210"), "+919876543210");
    }

    #[test]
    fn test_other_numbers_get_plus() {
        assert_eq!(normalizer().normalize("919876543210"), "+919876543210");
        assert_eq!(normalizer().normalize("15551234567"), "+15551234567");
        assert_eq!(normalizer().normalize(""), "+");
    }

    #[test]
    fn test_plus_prefixed_is_unchanged() {
        assert_eq!(normalizer().normalize("+447700900123"), "+447700900123");
        assert_eq!(normalizer().normalize(" +919876543210 "), "+919876543210");
    }

    #[test]
    fn test_configured_country_code() {
        let n = PhoneNormalizer::new("+44".parse().unwrap());
        assert_eq!(n.normalize("07700900123"), "+447700900123");
        assert_eq!(n.normalize("7700900123"), "+447700900123");
    }

    #[test]
    fn test_country_code_validation() {
        assert!("+1".parse::<CountryCode>().is_ok());
        assert!("+1264".parse::<CountryCode>().is_ok());
        assert!("91".parse::<CountryCode>().is_err());
        assert!("+".parse::<CountryCode>().is_err());
        assert!("+12345".parse::<CountryCode>().is_err());
        assert!("+9a".parse::<CountryCode>().is_err());
    }
}
