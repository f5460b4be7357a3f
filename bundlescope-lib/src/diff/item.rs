use crate::helpers::{format_duration, format_size, js_number, plural_with_value};
use crate::versions::VersionChange;
use serde::{Deserialize, Serialize};

/// A typed pair of before (`a`) and after (`b`) values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffItem {
    Time {
        a: f64,
        b: f64,
    },
    Size {
        a: f64,
        b: f64,
    },
    Number {
        a: f64,
        b: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        plural: Option<PluralHint>,
    },
    Version {
        a: String,
        b: String,
    },
}

/// Words used to pluralize a numeric delta, singular first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralHint {
    pub words: Vec<String>,
}

/// Render the change described by a diff item.
///
/// Version items render as `<release> <upgrade|downgrade> from <a>`, or as an empty
/// string when the versions are equal or unparseable.
#[must_use]
pub fn format_diff(item: &DiffItem) -> String {
    match item {
        DiffItem::Size { a, b } => format_size(b - a),
        DiffItem::Time { a, b } => format_duration(b - a),
        DiffItem::Version { a, b } => VersionChange::between(a, b)
            .map(|change| format!("{} {} from {a}", change.release, change.direction))
            .unwrap_or_default(),
        DiffItem::Number { a, b, plural } => match plural {
            Some(hint) => plural_with_value(b - a, &hint.words),
            None => js_number(b - a),
        },
    }
}
