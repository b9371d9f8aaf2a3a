use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

/// A byte count that may exceed 2^53.
///
/// Servers send sizes either as a JSON integer or as a decimal string. Both
/// are decoded from the raw JSON text straight into a `u128`, never through
/// `f64`, so large values keep every digit. Decoding is only supported from
/// `serde_json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TotalSize(pub u128);

impl TotalSize {
    pub fn bytes(&self) -> u128 {
        self.0
    }

    fn parse(raw: &str) -> Option<Self> {
        let digits = raw.trim();
        let digits = digits
            .strip_prefix('"')
            .and_then(|d| d.strip_suffix('"'))
            .unwrap_or(digits);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(TotalSize)
    }
}

impl From<TotalSize> for u128 {
    fn from(size: TotalSize) -> Self {
        size.0
    }
}

impl fmt::Display for TotalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TotalSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TotalSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        TotalSize::parse(raw.get()).ok_or_else(|| {
            de::Error::custom(format!(
                "expected a non-negative integer or integer string, got {}",
                raw.get()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Body {
        total_size: TotalSize,
    }

    #[test]
    fn test_beyond_f64_precision() {
        // 2^53 + 1 is the first integer f64 cannot represent
        let body: Body = serde_json::from_str(r#"{"totalSize": 9007199254740993}"#).unwrap();
        assert_eq!(body.total_size.bytes(), 9_007_199_254_740_993);

        let body: Body =
            serde_json::from_str(r#"{"totalSize": 340282366920938463463374607431768211455}"#)
                .unwrap();
        assert_eq!(body.total_size.bytes(), u128::MAX);
    }

    #[test]
    fn test_string_encoded() {
        let body: Body =
            serde_json::from_str(r#"{"totalSize": "18446744073709551617"}"#).unwrap();
        assert_eq!(body.total_size.bytes(), 18_446_744_073_709_551_617);
    }

    #[test]
    fn test_rejects_non_integers() {
        for raw in [r#"-1"#, r#"1.5"#, r#""""#, r#"null"#, r#""12a""#, r#"1e3"#] {
            let json = format!(r#"{{"totalSize": {}}}"#, raw);
            assert!(serde_json::from_str::<Body>(&json).is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&TotalSize(u128::MAX)).unwrap();
        assert_eq!(json, r#""340282366920938463463374607431768211455""#);
    }
}
