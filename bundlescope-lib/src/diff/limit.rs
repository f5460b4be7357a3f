use crate::helpers::percent_from;
use serde::{Deserialize, Serialize};

/// A threshold on either the absolute or the percent part of a [`ValueDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Limit {
    Absolute { number: f64 },
    Percent { number: f64 },
}

/// A limit as written by users: a bare number means an absolute limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitInput {
    Number(f64),
    Tagged(Limit),
}

impl From<LimitInput> for Limit {
    fn from(input: LimitInput) -> Self {
        match input {
            LimitInput::Number(number) => Self::Absolute { number },
            LimitInput::Tagged(limit) => limit,
        }
    }
}

/// Change between two measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDiff {
    pub absolute: f64,
    pub percent: f64,
}

impl ValueDiff {
    #[must_use]
    pub fn between(before: f64, after: f64) -> Self {
        Self {
            absolute: after - before,
            percent: percent_from(after, before, None),
        }
    }
}

#[must_use]
pub fn normalize_limit(limit: Option<LimitInput>) -> Option<Limit> {
    limit.map(Limit::from)
}

/// True when no limit is set or the relevant part of the diff does not exceed it.
#[must_use]
pub fn is_within_limit(diff: &ValueDiff, limit: Option<&Limit>) -> bool {
    match limit {
        None => true,
        Some(Limit::Absolute { number }) => diff.absolute <= *number,
        Some(Limit::Percent { number }) => diff.percent <= *number,
    }
}
