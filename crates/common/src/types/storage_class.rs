use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage tier governing the cost/latency tradeoff for stored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageClass {
    Hot,
    Warm,
    Glacier,
}

impl StorageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageClass::Hot => "hot",
            StorageClass::Warm => "warm",
            StorageClass::Glacier => "glacier",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown storage class: {0} (expected hot, warm or glacier)")]
pub struct StorageClassError(pub String);

impl FromStr for StorageClass {
    type Err = StorageClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(StorageClass::Hot),
            "warm" => Ok(StorageClass::Warm),
            "glacier" => Ok(StorageClass::Glacier),
            _ => Err(StorageClassError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&vec![StorageClass::Hot, StorageClass::Glacier]).unwrap();
        assert_eq!(json, r#"["hot","glacier"]"#);
        let back: Vec<StorageClass> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![StorageClass::Hot, StorageClass::Glacier]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Warm".parse::<StorageClass>().unwrap(), StorageClass::Warm);
        assert!("cold".parse::<StorageClass>().is_err());
    }
}
