use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FindingType {
    Error,
    Warn,
    Info,
}

/// One message reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingType,
    pub message: String,
    pub rule: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn test_type_names() {
        assert_eq!(FindingType::Warn.to_string(), "warn");
        assert_eq!(FindingType::from_str("info").unwrap(), FindingType::Info);
        assert!(FindingType::from_str("fatal").is_err());
    }
}
