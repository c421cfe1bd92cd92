//! Build index wire models
//!
//! Types representing the per-device build index document.

use serde::{Deserialize, Serialize};

/// One release entry from the build index.
///
/// Missing scalar fields coerce to empty defaults rather than failing the
/// whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub version: String,
    /// Small open set: OFFICIAL, BETA, IMG, SOURCEFORGE, UNOFFICIAL, ...
    #[serde(default)]
    pub build_type: String,
    #[serde(default)]
    pub date: String,
    /// Always a retrievable artifact by the time a build leaves the
    /// pipeline; a release page is never surfaced here.
    #[serde(default)]
    pub download_link: String,
    /// Release page reference, upgraded into a concrete asset when it
    /// matches the known release-page URL shape.
    #[serde(default, rename = "github_release")]
    pub release_page: Option<String>,
    #[serde(default)]
    pub changelog: Option<String>,
    /// Concrete artifact name, filled in by release-link resolution or
    /// the mirror listing.
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Build {
    /// Best-effort artifact name for the download handoff.
    ///
    /// Prefers the resolved file name, then a file-looking final URL
    /// segment, then the segment in front of a trailing `/download`
    /// (mirror links), then a generic name derived from the version.
    pub fn suggested_file_name(&self) -> String {
        if let Some(name) = &self.file_name {
            if !name.is_empty() {
                return name.clone();
            }
        }

        let link = self
            .download_link
            .split('?')
            .next()
            .unwrap_or(&self.download_link);
        // path segments only; the scheme and host never name a file
        let path = link
            .splitn(2, "://")
            .nth(1)
            .and_then(|rest| rest.split_once('/'))
            .map(|(_, path)| path)
            .unwrap_or("");
        let segments: Vec<&str> = path
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.last() {
            Some(&last) if last.contains('.') && last != "download" => last.to_string(),
            Some(&"download") if segments.len() > 1 => segments[segments.len() - 2].to_string(),
            _ => format!("PBRP-{}.zip", self.version),
        }
    }
}

/// The per-device build set: one optional latest build plus older builds
/// in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSet {
    #[serde(default)]
    pub latest: Option<Build>,
    #[serde(default, rename = "older_builds")]
    pub older: Vec<Build>,
}

impl BuildSet {
    /// A structurally valid document still counts as empty without builds.
    pub fn is_empty(&self) -> bool {
        self.latest.is_none() && self.older.is_empty()
    }

    /// Latest build followed by the older builds.
    pub fn iter(&self) -> impl Iterator<Item = &Build> {
        self.latest.iter().chain(self.older.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_document() {
        let doc = r#"{
            "latest": {
                "version": "4.0",
                "build_type": "OFFICIAL",
                "date": "2025-05-31",
                "download_link": "https://example.com/PBRP-fog-4.0.zip",
                "github_release": "https://github.com/owner/repo/releases/tag/v4.0"
            },
            "older_builds": [
                {"version": "3.1", "build_type": "OFFICIAL", "date": "2024-01-01",
                 "download_link": "https://example.com/PBRP-fog-3.1.zip"}
            ]
        }"#;

        let set: BuildSet = serde_json::from_str(doc).unwrap();
        assert!(!set.is_empty());
        assert_eq!(set.latest.as_ref().unwrap().version, "4.0");
        assert_eq!(
            set.latest.as_ref().unwrap().release_page.as_deref(),
            Some("https://github.com/owner/repo/releases/tag/v4.0")
        );
        assert_eq!(set.older.len(), 1);
    }

    #[test]
    fn test_deserialize_missing_fields_coerce_to_defaults() {
        let set: BuildSet = serde_json::from_str("{}").unwrap();
        assert!(set.is_empty());

        let set: BuildSet =
            serde_json::from_str(r#"{"latest": {"version": "4.0"}}"#).unwrap();
        let latest = set.latest.unwrap();
        assert_eq!(latest.version, "4.0");
        assert_eq!(latest.build_type, "");
        assert_eq!(latest.download_link, "");
        assert!(latest.release_page.is_none());
    }

    #[test]
    fn test_suggested_file_name_prefers_resolved_name() {
        let build = Build {
            file_name: Some("PBRP-fog-4.0.zip".into()),
            download_link: "https://example.com/other.zip".into(),
            ..Build::default()
        };
        assert_eq!(build.suggested_file_name(), "PBRP-fog-4.0.zip");
    }

    #[test]
    fn test_suggested_file_name_from_url_segment() {
        let build = Build {
            download_link: "https://example.com/dir/PBRP-fog-4.0.zip?ts=1".into(),
            ..Build::default()
        };
        assert_eq!(build.suggested_file_name(), "PBRP-fog-4.0.zip");
    }

    #[test]
    fn test_suggested_file_name_mirror_download_suffix() {
        let build = Build {
            download_link: "https://sourceforge.net/projects/pbrp/files/fog/PBRP-fog-4.0.zip/download".into(),
            ..Build::default()
        };
        assert_eq!(build.suggested_file_name(), "PBRP-fog-4.0.zip");
    }

    #[test]
    fn test_suggested_file_name_falls_back_to_version() {
        let build = Build {
            version: "4.0".into(),
            download_link: "https://example.com/files/latest".into(),
            ..Build::default()
        };
        assert_eq!(build.suggested_file_name(), "PBRP-4.0.zip");

        let no_link = Build {
            version: "3.1".into(),
            ..Build::default()
        };
        assert_eq!(no_link.suggested_file_name(), "PBRP-3.1.zip");
    }

    #[test]
    fn test_iter_yields_latest_first() {
        let set = BuildSet {
            latest: Some(Build {
                version: "4.0".into(),
                ..Build::default()
            }),
            older: vec![Build {
                version: "3.1".into(),
                ..Build::default()
            }],
        };
        let versions: Vec<&str> = set.iter().map(|b| b.version.as_str()).collect();
        assert_eq!(versions, vec!["4.0", "3.1"]);
    }
}
