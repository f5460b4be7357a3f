use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// An identifier as it appears in raw input: bundlers emit both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawIdRepr", into = "String")]
pub struct RawId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdRepr {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawIdRepr> for RawId {
    fn from(repr: RawIdRepr) -> Self {
        match repr {
            RawIdRepr::Number(n) => Self(n.to_string()),
            RawIdRepr::Text(s) => Self(s),
        }
    }
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        id.0
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl RawId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for RawId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
