//! Device registry client
//!
//! The global vendor -> codename registry is advisory: it supplies the
//! canonical vendor key, display name, and maintainer, and lets the
//! pipeline tell "officially supported but index missing" apart from
//! "not supported". Failures never fail a resolution.

use std::collections::{BTreeMap, HashMap};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{log_debug, log_info, log_warn, net};

const MODULE: &str = "registry";

/// Per-device entry in the registry document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub maintainer: Option<String>,
}

/// A registry hit: the entry plus the vendor key it was filed under.
///
/// The vendor key, not the device's raw manufacturer string, keys the
/// per-device page lookup.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryMatch {
    pub vendor: String,
    pub entry: RegistryEntry,
}

/// One catalog row for a selection UI.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDevice {
    pub codename: String,
    pub name: String,
}

/// Indexed snapshot of one fetched registry document.
///
/// The codename lookup is a flattened map built once per document; the
/// three casing variants are alternate probe keys at lookup time.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    index: HashMap<String, RegistryMatch>,
    catalog: BTreeMap<String, Vec<CatalogDevice>>,
}

impl DeviceRegistry {
    /// Build the flattened index and catalog from the raw document.
    /// Entries that are not objects are skipped.
    pub fn from_json(doc: &serde_json::Value) -> Self {
        let mut index: HashMap<String, RegistryMatch> = HashMap::new();
        let mut catalog: BTreeMap<String, Vec<CatalogDevice>> = BTreeMap::new();

        let Some(vendors) = doc.as_object() else {
            return Self::default();
        };

        for (vendor_key, devices) in vendors {
            let Some(devices) = devices.as_object() else {
                continue;
            };

            let mut named: Vec<CatalogDevice> = Vec::new();
            for (codename, raw) in devices {
                let entry: RegistryEntry = serde_json::from_value(raw.clone()).unwrap_or_default();

                if let Some(name) = &entry.name {
                    named.push(CatalogDevice {
                        codename: codename.clone(),
                        name: name.clone(),
                    });
                }

                // first vendor in document order wins for duplicate keys
                index.entry(codename.clone()).or_insert_with(|| RegistryMatch {
                    vendor: vendor_key.clone(),
                    entry,
                });
            }

            if !named.is_empty() {
                named.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                catalog.insert(capitalize(vendor_key), named);
            }
        }

        Self { index, catalog }
    }

    /// Priority probe: exact key, then lowercase, then uppercase.
    pub fn lookup(&self, codename: &str) -> Option<&RegistryMatch> {
        self.index
            .get(codename)
            .or_else(|| self.index.get(&codename.to_lowercase()))
            .or_else(|| self.index.get(&codename.to_uppercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of indexed devices.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Vendor groups for a selection UI: display vendor -> devices sorted
    /// by display name.
    pub fn catalog(&self) -> &BTreeMap<String, Vec<CatalogDevice>> {
        &self.catalog
    }

    /// Case-insensitive substring search across "vendor name codename".
    /// Vendors with no matching devices are dropped.
    pub fn search(&self, query: &str) -> BTreeMap<String, Vec<CatalogDevice>> {
        let query = query.to_lowercase();
        let query = query.trim();
        if query.is_empty() {
            return self.catalog.clone();
        }

        let mut result = BTreeMap::new();
        for (vendor, devices) in &self.catalog {
            let matching: Vec<CatalogDevice> = devices
                .iter()
                .filter(|device| {
                    let haystack = format!("{} {} {}", vendor, device.name, device.codename);
                    haystack.to_lowercase().contains(query)
                })
                .cloned()
                .collect();
            if !matching.is_empty() {
                result.insert(vendor.clone(), matching);
            }
        }
        result
    }
}

/// "xiaomi" -> "Xiaomi"; already-capitalized keys pass through.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Fetch and index the registry document. Advisory: every failure maps to
/// `None` so the caller can keep resolving without it.
pub async fn fetch_registry(client: &Client, url: &str) -> Option<DeviceRegistry> {
    log_info!(MODULE, "Fetching device registry from {}", url);

    let doc = match net::get_json::<serde_json::Value>(client, url).await {
        Ok(doc) => doc,
        Err(err) => {
            log_warn!(MODULE, "Registry unavailable: {}", err);
            return None;
        }
    };

    let registry = DeviceRegistry::from_json(&doc);
    if registry.is_empty() {
        log_debug!(MODULE, "Registry document indexed no devices");
    } else {
        log_info!(MODULE, "Indexed {} devices", registry.len());
    }
    Some(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_doc() -> serde_json::Value {
        serde_json::json!({
            "xiaomi": {
                "fog": {"name": "Redmi 10C", "maintainer": "Jane Doe (@jdoe)"},
                "lavender": {"name": "Redmi Note 7"}
            },
            "samsung": {
                "A50": {"name": "Galaxy A50", "maintainer": "@sam"},
                "nocard": {}
            }
        })
    }

    #[test]
    fn test_lookup_exact_key() {
        let registry = DeviceRegistry::from_json(&sample_doc());
        let hit = registry.lookup("fog").unwrap();
        assert_eq!(hit.vendor, "xiaomi");
        assert_eq!(hit.entry.name.as_deref(), Some("Redmi 10C"));
    }

    #[test]
    fn test_lookup_casing_variants() {
        let registry = DeviceRegistry::from_json(&sample_doc());

        // mixed-case registry key found from a lowercase probe
        let hit = registry.lookup("a50").unwrap();
        assert_eq!(hit.vendor, "samsung");
        assert_eq!(hit.entry.name.as_deref(), Some("Galaxy A50"));

        // uppercase probe falls back to the lowercase key
        let hit = registry.lookup("FOG").unwrap();
        assert_eq!(hit.vendor, "xiaomi");

        assert!(registry.lookup("unknown").is_none());
    }

    #[test]
    fn test_index_skips_malformed_vendor_groups() {
        let doc = serde_json::json!({
            "xiaomi": {"fog": {"name": "Redmi 10C"}},
            "broken": "not an object"
        });
        let registry = DeviceRegistry::from_json(&doc);
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("fog").is_some());
    }

    #[test]
    fn test_catalog_sorted_and_capitalized() {
        let registry = DeviceRegistry::from_json(&sample_doc());
        let catalog = registry.catalog();

        let vendors: Vec<&str> = catalog.keys().map(|s| s.as_str()).collect();
        assert_eq!(vendors, vec!["Samsung", "Xiaomi"]);

        // entries without a display name are dropped from the catalog
        let samsung = &catalog["Samsung"];
        assert_eq!(samsung.len(), 1);
        assert_eq!(samsung[0].codename, "A50");

        let xiaomi = &catalog["Xiaomi"];
        let names: Vec<&str> = xiaomi.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Redmi 10C", "Redmi Note 7"]);
    }

    #[test]
    fn test_search_matches_vendor_name_and_codename() {
        let registry = DeviceRegistry::from_json(&sample_doc());

        let by_codename = registry.search("lavender");
        assert_eq!(by_codename.len(), 1);
        assert_eq!(by_codename["Xiaomi"][0].codename, "lavender");

        let by_vendor = registry.search("samsung");
        assert!(by_vendor.contains_key("Samsung"));

        let by_name = registry.search("redmi note");
        assert_eq!(by_name["Xiaomi"][0].name, "Redmi Note 7");

        assert!(registry.search("pixel").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_registry_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pb_devices.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_doc()))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let url = format!("{}/pb_devices.json", server.uri());
        let registry = fetch_registry(&client, &url).await.unwrap();
        assert!(registry.lookup("fog").is_some());
    }

    #[tokio::test]
    async fn test_fetch_registry_failure_is_advisory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pb_devices.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let url = format!("{}/pb_devices.json", server.uri());
        assert!(fetch_registry(&client, &url).await.is_none());

        // malformed documents are advisory too
        Mock::given(method("GET"))
            .and(path("/bad.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1, 2"))
            .mount(&server)
            .await;
        let url = format!("{}/bad.json", server.uri());
        assert!(fetch_registry(&client, &url).await.is_none());
    }
}
