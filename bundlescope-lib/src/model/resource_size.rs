use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Raw byte size of a resource plus its size under each compressor that measured it.
///
/// A compressor that has no entry is "not available", which is distinct from a
/// compressed size of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSize {
    pub raw: u64,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compressed: BTreeMap<String, u64>,
}

impl ResourceSize {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self {
            raw,
            compressed: BTreeMap::new(),
        }
    }

    /// Size under `compressor`, or the raw size when no compressor is requested.
    #[must_use]
    pub fn get(&self, compressor: Option<&str>) -> Option<u64> {
        compressor.map_or(Some(self.raw), |name| self.compressed.get(name).copied())
    }

    /// Sum several sizes.
    ///
    /// The raw sizes always add up; a compressor is only kept when every part carries it.
    pub fn sum<'a>(parts: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut parts = parts.into_iter();
        let Some(first) = parts.next() else {
            return Self::default();
        };

        let mut total = first.clone();
        for part in parts {
            total.raw = total.raw.saturating_add(part.raw);
            total.compressed.retain(|name, size| {
                part.compressed.get(name).is_some_and(|other| {
                    *size = size.saturating_add(*other);
                    true
                })
            });
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(raw: u64, compressed: &[(&str, u64)]) -> ResourceSize {
        ResourceSize {
            raw,
            compressed: compressed.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_get_distinguishes_missing_from_zero() {
        let s = size(100, &[("gzip", 0)]);
        assert_eq!(s.get(None), Some(100));
        assert_eq!(s.get(Some("gzip")), Some(0));
        assert_eq!(s.get(Some("brotli")), None);
    }

    #[test]
    fn test_sum_keeps_only_common_compressors() {
        let parts = [size(10, &[("gzip", 4), ("brotli", 3)]), size(20, &[("gzip", 6)])];
        let total = ResourceSize::sum(&parts);

        assert_eq!(total.raw, 30);
        assert_eq!(total.get(Some("gzip")), Some(10));
        assert_eq!(total.get(Some("brotli")), None);
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total = ResourceSize::sum(&[]);
        assert_eq!(total, ResourceSize::default());
    }
}
