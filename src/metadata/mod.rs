//! Device page parsing
//!
//! Total text processing over the free-form per-device markdown: scalar
//! `key: value` fields, hazard markers, and install-method markers. Never
//! fails; absent markers simply yield empty results.

mod tables;

pub use tables::{FeatureSeverity, InstallKind};

use regex::Regex;
use serde::Serialize;

use tables::{InstallSpec, FEATURE_SPECS, INSTALL_SPECS, RECOVERY_ZIP_SPEC};

/// A hazard/capability flag detected in the device page.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceFeature {
    pub title: String,
    pub detail: String,
    pub severity: FeatureSeverity,
}

/// A classified install procedure with human-readable steps.
#[derive(Debug, Clone, Serialize)]
pub struct InstallMethod {
    pub kind: InstallKind,
    pub title: String,
    pub steps: Vec<String>,
    pub note: Option<String>,
}

impl From<&InstallSpec> for InstallMethod {
    fn from(spec: &InstallSpec) -> Self {
        InstallMethod {
            kind: spec.kind,
            title: spec.title.to_string(),
            steps: spec.steps.iter().map(|s| s.to_string()).collect(),
            note: spec.note.map(|s| s.to_string()),
        }
    }
}

/// Extract a `key: value` scalar, case-insensitive on the key. Empty when
/// absent or unmatchable.
pub fn scalar_field(content: &str, key: &str) -> String {
    let pattern = format!(r"(?i){}:\s*(.*)", regex::escape(key));
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// The page's maintainer line.
pub fn maintainer(content: &str) -> String {
    scalar_field(content, "maintainer")
}

/// The page's title line with surrounding quotes stripped.
pub fn page_title(content: &str) -> String {
    scalar_field(content, "title").replace('"', "")
}

/// GitHub handle from a maintainer string: the first `@word`, else a
/// best-effort slice after the first `@`.
pub fn maintainer_handle(maintainer: &str) -> Option<String> {
    if let Some(word) = maintainer
        .split_whitespace()
        .find(|word| word.starts_with('@'))
    {
        let handle = word
            .trim_start_matches('@')
            .trim_matches(|c| c == '(' || c == ')' || c == ',');
        if !handle.is_empty() {
            return Some(handle.to_string());
        }
    }

    let after = maintainer.split_once('@')?.1;
    let handle = after.split([' ', ')']).next().unwrap_or("");
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}

/// Detect hazard features by marker presence, in table order.
pub fn parse_features(content: &str) -> Vec<DeviceFeature> {
    let haystack = content.to_lowercase();
    FEATURE_SPECS
        .iter()
        .filter(|spec| haystack.contains(spec.marker))
        .map(|spec| DeviceFeature {
            title: spec.title.to_string(),
            detail: spec.detail.to_string(),
            severity: spec.severity,
        })
        .collect()
}

/// Detect install methods by marker presence, in table order. The generic
/// recovery-zip method is appended when its marker is present or when no
/// other marker matched (including a missing document).
pub fn parse_install_methods(content: &str) -> Vec<InstallMethod> {
    let haystack = content.to_lowercase();
    let mut methods: Vec<InstallMethod> = INSTALL_SPECS
        .iter()
        .filter(|spec| haystack.contains(spec.marker))
        .map(InstallMethod::from)
        .collect();

    if haystack.contains(RECOVERY_ZIP_SPEC.marker) || methods.is_empty() {
        methods.push(InstallMethod::from(&RECOVERY_ZIP_SPEC));
    }

    methods
}
