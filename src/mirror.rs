//! Mirror fallback client
//!
//! When the official index has nothing for any candidate, the project
//! file mirror's RSS feed scoped to the device path is the source of
//! last resort. Feed order is preserved: the first matching entry is
//! treated as the newest (parsed dates are kept on every build so a
//! caller can re-sort if upstream ordering proves unreliable).

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use xmltree::{Element, XMLNode};

use crate::builds::{Build, BuildSet};
use crate::{log_debug, log_info, log_warn};

const MODULE: &str = "mirror";

/// Feed outcomes map to distinct terminal statuses; the caller decides
/// whether a manual-browse fallback is worth offering.
#[derive(Debug)]
pub enum MirrorOutcome {
    Found(BuildSet),
    /// Feed reachable but no matching files under the device path.
    Empty,
    /// The mirror explicitly has no such path.
    NotFound,
    /// Transport or parse failure.
    Unreachable,
}

// Filename convention: PBRP-<device>-<version>-<yyyymmdd>-<time>-<TAG>.zip
static FILE_META_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PBRP-.*?-(\d+(?:\.\d+)+)-(\d{8}).*?-(OFFICIAL|BETA|UNOFFICIAL).*?\.zip")
        .expect("mirror filename pattern")
});

/// Feed URL scoped to one device path.
pub fn feed_url(base: &str, codename: &str) -> String {
    format!("{}?path=/{}", base, codename)
}

/// Directory listing URL for a manual-browse fallback.
pub fn browse_url(files_base: &str, codename: &str) -> String {
    format!("{}/{}/", files_base, codename)
}

/// Query the mirror feed for one device codename (lowercase).
pub async fn check_mirror(
    client: &Client,
    feed_base: &str,
    files_base: &str,
    codename: &str,
) -> MirrorOutcome {
    let url = feed_url(feed_base, codename);
    log_info!(MODULE, "Scanning mirror feed at {}", url);

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(err) => {
            log_warn!(MODULE, "Mirror unreachable: {}", err);
            return MirrorOutcome::Unreachable;
        }
    };

    if response.status() == StatusCode::NOT_FOUND {
        log_info!(MODULE, "Mirror has no path for {}", codename);
        return MirrorOutcome::NotFound;
    }
    if !response.status().is_success() {
        log_warn!(MODULE, "Mirror feed returned {}", response.status());
        return MirrorOutcome::Unreachable;
    }

    let xml = match response.text().await {
        Ok(xml) => xml,
        Err(err) => {
            log_warn!(MODULE, "Mirror feed body unreadable: {}", err);
            return MirrorOutcome::Unreachable;
        }
    };

    let builds = match parse_feed(&xml, files_base, codename) {
        Ok(builds) => builds,
        Err(err) => {
            log_warn!(MODULE, "Mirror feed did not parse: {}", err);
            return MirrorOutcome::Unreachable;
        }
    };

    if builds.is_empty() {
        log_info!(MODULE, "Mirror has nothing under /{}", codename);
        return MirrorOutcome::Empty;
    }

    log_info!(MODULE, "Mirror lists {} builds for {}", builds.len(), codename);
    let mut builds = builds.into_iter();
    let latest = builds.next();
    MirrorOutcome::Found(BuildSet {
        latest,
        older: builds.collect(),
    })
}

/// Walk `channel > item` entries, keeping files under the device path
/// that look like flashable artifacts.
fn parse_feed(
    xml: &str,
    files_base: &str,
    codename: &str,
) -> Result<Vec<Build>, xmltree::ParseError> {
    let root = Element::parse(xml.as_bytes())?;
    let prefix = format!("/{}/", codename).to_lowercase();
    let mut builds = Vec::new();

    for channel in root
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(|element| element.name == "channel")
    {
        for item in channel
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .filter(|element| element.name == "item")
        {
            let title = child_text(item, "title");
            if !title.to_lowercase().starts_with(&prefix) {
                continue;
            }

            let file_name = title.rsplit('/').next().unwrap_or_default().to_string();
            let lower = file_name.to_lowercase();
            let is_image = lower.ends_with(".img");
            let is_archive = lower.starts_with("pbrp") && lower.ends_with(".zip");
            if !is_image && !is_archive {
                log_debug!(MODULE, "Skipping unrecognized mirror file {}", file_name);
                continue;
            }

            let link = format!("{}{}/download", files_base, title);
            let pub_date = child_text(item, "pubDate");
            builds.push(build_from_file(&file_name, link, &pub_date));
        }
    }

    Ok(builds)
}

/// Text content of a named child, CDATA included.
fn child_text(element: &Element, name: &str) -> String {
    match element.get_child(name) {
        Some(child) => child
            .children
            .iter()
            .filter_map(|node| match node {
                XMLNode::Text(text) => Some(text.as_str()),
                XMLNode::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<String>()
            .trim()
            .to_string(),
        None => String::new(),
    }
}

/// Extract version/date/type from the mirror file naming convention,
/// falling back to the feed's publish date and extension-derived type.
fn build_from_file(file_name: &str, link: String, feed_date: &str) -> Build {
    let mut version = String::from("Unknown");
    let mut date = feed_date.to_string();
    let mut build_type = String::from("SOURCEFORGE");

    if let Some(caps) = FILE_META_RE.captures(file_name) {
        version = caps[1].to_string();
        let raw = &caps[2];
        date = format!("{}-{}-{}", &raw[0..4], &raw[4..6], &raw[6..8]);
        build_type = caps[3].to_uppercase();
    } else {
        // RFC 2822 feed dates carry a time and zone; keep the date part
        if let Ok(parsed) = DateTime::parse_from_rfc2822(feed_date) {
            date = parsed.format("%Y-%m-%d").to_string();
        }
        if file_name.to_lowercase().ends_with(".img") {
            version = "Image".into();
            build_type = "IMG".into();
        }
    }

    Build {
        version,
        build_type,
        date,
        download_link: link,
        release_page: None,
        changelog: None,
        file_name: Some(file_name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FILES_BASE: &str = "https://mirror.example/files";

    fn feed(items: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <rss version=\"2.0\"><channel><title>files</title>{}</channel></rss>",
            items
        )
    }

    fn item(title: &str, pub_date: &str) -> String {
        format!(
            "<item><title><![CDATA[{}]]></title><pubDate>{}</pubDate></item>",
            title, pub_date
        )
    }

    #[test]
    fn test_filename_pattern_extraction() {
        let build = build_from_file(
            "PBRP-device-4.0-20250531-1806-OFFICIAL.zip",
            "https://mirror.example/dl".into(),
            "Sat, 31 May 2025 18:06:00 UT",
        );
        assert_eq!(build.version, "4.0");
        assert_eq!(build.date, "2025-05-31");
        assert_eq!(build.build_type, "OFFICIAL");
        assert_eq!(
            build.file_name.as_deref(),
            Some("PBRP-device-4.0-20250531-1806-OFFICIAL.zip")
        );
    }

    #[test]
    fn test_filename_pattern_beta_tag_and_multipart_version() {
        let build = build_from_file(
            "PBRP-a50-3.1.0-20240102-0001-BETA.zip",
            "link".into(),
            "",
        );
        assert_eq!(build.version, "3.1.0");
        assert_eq!(build.date, "2024-01-02");
        assert_eq!(build.build_type, "BETA");
    }

    #[test]
    fn test_image_fallback_uses_feed_date() {
        let build = build_from_file(
            "recovery.img",
            "link".into(),
            "Sat, 31 May 2025 18:06:00 UT",
        );
        assert_eq!(build.version, "Image");
        assert_eq!(build.build_type, "IMG");
        assert_eq!(build.date, "2025-05-31");
    }

    #[test]
    fn test_unparseable_feed_date_kept_raw() {
        let build = build_from_file("odd.img", "link".into(), "sometime");
        assert_eq!(build.date, "sometime");
        assert_eq!(build.build_type, "IMG");
    }

    #[test]
    fn test_parse_feed_filters_and_orders() {
        let xml = feed(&format!(
            "{}{}{}{}",
            item(
                "/fog/PBRP-fog-4.0-20250531-1806-OFFICIAL.zip",
                "Sat, 31 May 2025 18:06:00 UT"
            ),
            item(
                "/fog/PBRP-fog-3.1-20240101-0001-OFFICIAL.zip",
                "Mon, 01 Jan 2024 00:01:00 UT"
            ),
            // wrong path: ignored
            item("/other/PBRP-other-4.0-20250531-1806-OFFICIAL.zip", ""),
            // under the path but not a recognized artifact: ignored
            item("/fog/checksums.txt", "")
        ));

        let builds = parse_feed(&xml, FILES_BASE, "fog").unwrap();
        assert_eq!(builds.len(), 2);
        assert_eq!(builds[0].version, "4.0");
        assert_eq!(builds[1].version, "3.1");
        assert_eq!(
            builds[0].download_link,
            format!(
                "{}/fog/PBRP-fog-4.0-20250531-1806-OFFICIAL.zip/download",
                FILES_BASE
            )
        );
    }

    #[test]
    fn test_parse_feed_keeps_images() {
        let xml = feed(&item("/fog/recovery.img", "Sat, 31 May 2025 18:06:00 UT"));
        let builds = parse_feed(&xml, FILES_BASE, "fog").unwrap();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].build_type, "IMG");
    }

    #[test]
    fn test_parse_feed_rejects_malformed_xml() {
        assert!(parse_feed("<rss><channel>", FILES_BASE, "fog").is_err());
    }

    #[tokio::test]
    async fn test_check_mirror_found() {
        let server = MockServer::start().await;
        let xml = feed(&item(
            "/fog/PBRP-fog-4.0-20250531-1806-OFFICIAL.zip",
            "Sat, 31 May 2025 18:06:00 UT",
        ));
        Mock::given(method("GET"))
            .and(query_param("path", "/fog"))
            .respond_with(ResponseTemplate::new(200).set_body_string(xml))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let outcome = check_mirror(&client, &server.uri(), FILES_BASE, "fog").await;

        match outcome {
            MirrorOutcome::Found(set) => {
                assert_eq!(set.latest.unwrap().version, "4.0");
                assert!(set.older.is_empty());
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_mirror_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("path", "/fog"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed("")))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let outcome = check_mirror(&client, &server.uri(), FILES_BASE, "fog").await;
        assert!(matches!(outcome, MirrorOutcome::Empty));
    }

    #[tokio::test]
    async fn test_check_mirror_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("path", "/fog"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let outcome = check_mirror(&client, &server.uri(), FILES_BASE, "fog").await;
        assert!(matches!(outcome, MirrorOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_check_mirror_unreachable_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("path", "/fog"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let outcome = check_mirror(&client, &server.uri(), FILES_BASE, "fog").await;
        assert!(matches!(outcome, MirrorOutcome::Unreachable));
    }

    #[tokio::test]
    async fn test_check_mirror_unreachable_on_malformed_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("path", "/fog"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel>"))
            .mount(&server)
            .await;

        let client = net::client().unwrap();
        let outcome = check_mirror(&client, &server.uri(), FILES_BASE, "fog").await;
        assert!(matches!(outcome, MirrorOutcome::Unreachable));
    }

    #[test]
    fn test_browse_url() {
        assert_eq!(
            browse_url("https://mirror.example/files", "fog"),
            "https://mirror.example/files/fog/"
        );
    }
}
