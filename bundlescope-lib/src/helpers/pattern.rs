use core::fmt::{self, Display, Formatter};
use ohno::{IntoAppError, app_err};
use regex::{Regex, RegexBuilder};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Either an exact string or a regular expression.
///
/// The serialized form is `{ "type": "string", "content": ... }` or
/// `{ "type": "regexp", "content": ..., "flags": ... }`. When deserializing, a bare
/// string is also accepted: `/body/flags` becomes a regular expression and anything else
/// is an exact match.
#[derive(Debug, Clone)]
pub enum Pattern {
    Exact(String),
    Regex { regex: Regex, source: String, flags: String },
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SerializedPattern {
    String {
        content: String,
    },
    Regexp {
        content: String,
        #[serde(default)]
        flags: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Text(String),
    Tagged(SerializedPattern),
}

impl Pattern {
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Compile a regular expression from its source and flags.
    ///
    /// Supported flags are `i`, `m` and `s`; `g`, `u`, `y` and `d` are accepted and
    /// have no effect on matching.
    pub fn regex(source: &str, flags: &str) -> crate::Result<Self> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            let _ = match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'g' | 'u' | 'y' | 'd' => &mut builder,
                other => return Err(app_err!("unsupported regular expression flag '{other}' in /{source}/{flags}")),
            };
        }

        let regex = builder
            .build()
            .into_app_err_with(|| format!("invalid regular expression /{source}/{flags}"))?;

        Ok(Self::Regex {
            regex,
            source: source.to_string(),
            flags: flags.to_string(),
        })
    }

    /// Parse the textual form: `/body/flags` is a regular expression, anything else is exact.
    pub fn parse(text: &str) -> crate::Result<Self> {
        if let Some(rest) = text.strip_prefix('/')
            && let Some(end) = rest.rfind('/')
            && end > 0
        {
            let (source, flags) = rest.split_at(end);
            let flags = &flags[1..];
            if flags.chars().all(|c| c.is_ascii_lowercase()) {
                return Self::regex(source, flags);
            }
        }

        Ok(Self::Exact(text.to_string()))
    }

    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Exact(text) => text == value,
            Self::Regex { regex, .. } => regex.is_match(value),
        }
    }

    #[must_use]
    pub const fn is_regex(&self) -> bool {
        matches!(self, Self::Regex { .. })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Regex { source: a, flags: fa, .. }, Self::Regex { source: b, flags: fb, .. }) => a == b && fa == fb,
            _ => false,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text}"),
            Self::Regex { source, flags, .. } => write!(f, "/{source}/{flags}"),
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Exact(text) => SerializedPattern::String { content: text.clone() },
            Self::Regex { source, flags, .. } => SerializedPattern::Regexp {
                content: source.clone(),
                flags: flags.clone(),
            },
        };

        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let result = match PatternRepr::deserialize(deserializer)? {
            PatternRepr::Text(text) => Self::parse(&text),
            PatternRepr::Tagged(SerializedPattern::String { content }) => Ok(Self::Exact(content)),
            PatternRepr::Tagged(SerializedPattern::Regexp { content, flags }) => Self::regex(&content, &flags),
        };

        result.map_err(D::Error::custom)
    }
}

/// Match an optional value against an optional pattern.
///
/// When either side is missing or the value is empty, only identical inputs match.
#[must_use]
pub fn is_match(value: Option<&str>, pattern: Option<&Pattern>) -> bool {
    match (value, pattern) {
        (Some(""), Some(pattern)) => matches!(pattern, Pattern::Exact(text) if text.is_empty()),
        (Some(value), Some(pattern)) => pattern.is_match(value),
        (None, None) => true,
        _ => false,
    }
}

/// Keep the items whose extracted field matches none of `patterns`.
pub fn exclude<'a, T>(items: &'a [T], patterns: &[Pattern], get: impl Fn(&T) -> Option<&str>) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| {
            let value = get(item);
            !patterns.iter().any(|pattern| is_match(value, Some(pattern)))
        })
        .collect()
}
