use super::to_fixed;
use serde::Serialize;

/// Bytes transferred per second at one megabit per second.
pub const BYTES_IN_MBIT: f64 = 131_072.0;

/// A named network profile used to estimate download times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkType {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,

    /// Typical throughput in bytes per second.
    pub typical_speed: f64,
}

const fn mbit(kind: &'static str, name: &'static str, speed: f64) -> NetworkType {
    NetworkType {
        kind,
        name,
        typical_speed: speed * BYTES_IN_MBIT,
    }
}

pub const NETWORK_TYPES: &[NetworkType] = &[
    mbit("Mobile", "GPRS", 0.1),
    mbit("Mobile", "EDGE", 0.2),
    mbit("Mobile", "3G Slow", 0.4),
    mbit("Mobile", "3G Basic", 1.6),
    mbit("Mobile", "3G Fast", 4.0),
    mbit("Mobile", "4G", 7.0),
    mbit("Mobile", "LTE", 12.0),
    mbit("Mobile", "5G", 100.0),
    mbit("Fixed", "Dial Up", 0.05),
    mbit("Fixed", "DSL", 2.0),
    mbit("Fixed", "Cable", 10.0),
    mbit("Fixed", "Fiber", 100.0),
];

#[must_use]
pub fn network_type(name: &str) -> Option<&'static NetworkType> {
    NETWORK_TYPES.iter().find(|item| item.name == name)
}

/// Human label such as `Mobile: 3G Fast (4 MBit/s)`.
#[must_use]
pub fn network_type_name(network: &NetworkType) -> String {
    let speed: f64 = to_fixed(network.typical_speed / BYTES_IN_MBIT, 1)
        .parse()
        .unwrap_or(network.typical_speed / BYTES_IN_MBIT);

    format!("{}: {} ({} MBit/s)", network.kind, network.name, super::js_number(speed))
}

/// Milliseconds needed to fetch `size` bytes over the named network, `None` if unknown.
#[must_use]
pub fn download_time(size: f64, network: &str) -> Option<f64> {
    network_type(network).map(|item| size / item.typical_speed * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(network_type("3G Fast").unwrap().kind, "Mobile");
        assert!(network_type("Carrier Pigeon").is_none());
    }

    #[test]
    fn test_name() {
        assert_eq!(network_type_name(network_type("3G Basic").unwrap()), "Mobile: 3G Basic (1.6 MBit/s)");
        assert_eq!(network_type_name(network_type("Cable").unwrap()), "Fixed: Cable (10 MBit/s)");
    }

    #[test]
    fn test_download_time() {
        let ms = download_time(BYTES_IN_MBIT * 2.0, "DSL").unwrap();
        assert!((ms - 1000.0).abs() < 1e-9);
        assert!(download_time(100.0, "unknown").is_none());
    }
}
