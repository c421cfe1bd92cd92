//! Device identity
//!
//! The raw identifier handed in by the platform (or a manual selection)
//! plus the casing variants tried against the build sources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw device identity, case preserved. Immutable per resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentifier {
    pub vendor: String,
    pub codename: String,
}

impl DeviceIdentifier {
    pub fn new(vendor: impl Into<String>, codename: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            codename: codename.into(),
        }
    }

    /// Candidate casings in fetch priority order.
    ///
    /// The primary source indexes by lowercase path segments while the
    /// registry may use mixed case, so lowercase goes first, the raw pair
    /// second, uppercase last. Duplicates collapse.
    pub fn candidates(&self) -> Vec<DeviceCandidate> {
        let variants = [
            DeviceCandidate {
                vendor: self.vendor.to_lowercase(),
                codename: self.codename.to_lowercase(),
            },
            DeviceCandidate {
                vendor: self.vendor.clone(),
                codename: self.codename.clone(),
            },
            DeviceCandidate {
                vendor: self.vendor.to_uppercase(),
                codename: self.codename.to_uppercase(),
            },
        ];

        let mut candidates: Vec<DeviceCandidate> = Vec::with_capacity(variants.len());
        for candidate in variants {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.codename)
    }
}

/// One casing variant of the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCandidate {
    pub vendor: String,
    pub codename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_lowercase_first() {
        let device = DeviceIdentifier::new("Xiaomi", "Fog");
        let candidates = device.candidates();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].codename, "fog");
        assert_eq!(candidates[0].vendor, "xiaomi");
        assert_eq!(candidates[1].codename, "Fog");
        assert_eq!(candidates[2].codename, "FOG");
    }

    #[test]
    fn test_candidates_deduplicate() {
        let device = DeviceIdentifier::new("xiaomi", "fog");
        let candidates = device.candidates();

        // as-given equals lowercase, so only two variants survive
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].codename, "fog");
        assert_eq!(candidates[1].codename, "FOG");
    }

    #[test]
    fn test_candidates_exact_set() {
        let device = DeviceIdentifier::new("Samsung", "A50");
        let candidates = device.candidates();

        // codename uppercases to itself, but the vendor still differs
        let pairs: Vec<(&str, &str)> = candidates
            .iter()
            .map(|c| (c.vendor.as_str(), c.codename.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("samsung", "a50"), ("Samsung", "A50"), ("SAMSUNG", "A50")]
        );
    }

    #[test]
    fn test_display() {
        let device = DeviceIdentifier::new("Xiaomi", "fog");
        assert_eq!(device.to_string(), "Xiaomi/fog");
    }
}
