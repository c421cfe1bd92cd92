//! Release link resolution
//!
//! Upgrades a build whose release-page link matches the well-known
//! `github.com/{owner}/{repo}/releases/tag/{tag}` shape into a concrete
//! asset download. Fails closed on every path: the build index already
//! guarantees a usable (if less specific) download link, so the original
//! build always survives.

use futures_util::future::{join, join_all};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::builds::{Build, BuildSet};
use crate::log_debug;

const MODULE: &str = "release";

static RELEASE_PAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https://github\.com/([^/]+)/([^/]+)/releases/tag/([^/]+)/?")
        .expect("release page pattern")
});

#[derive(Debug, Deserialize)]
struct ReleaseDocument {
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    browser_download_url: String,
}

/// Convert a release-page URL into the corresponding assets API query.
/// `None` when the URL does not match the expected shape.
pub fn assets_api_url(api_base: &str, page_url: &str) -> Option<String> {
    let caps = RELEASE_PAGE_RE.captures(page_url)?;
    Some(format!(
        "{}/repos/{}/{}/releases/tags/{}",
        api_base,
        &caps[1],
        &caps[2],
        caps[3].trim_end_matches('/')
    ))
}

/// Strict asset priority: the first `.zip` wins immediately; the first
/// `.img` is kept while the scan continues in case a zip shows up later.
fn best_asset(assets: &[ReleaseAsset]) -> Option<&ReleaseAsset> {
    let mut image: Option<&ReleaseAsset> = None;
    for asset in assets {
        let name = asset.name.to_lowercase();
        if name.ends_with(".zip") {
            return Some(asset);
        }
        if name.ends_with(".img") && image.is_none() {
            image = Some(asset);
        }
    }
    image
}

/// Resolve one build's release-page link into a concrete asset. Any
/// failure (missing link, shape mismatch, network, parse, no usable
/// asset) preserves the input unchanged.
pub async fn resolve_build(client: &Client, api_base: &str, build: Build) -> Build {
    let Some(page) = build.release_page.clone() else {
        return build;
    };
    let Some(api_url) = assets_api_url(api_base, &page) else {
        return build;
    };

    log_debug!(MODULE, "Resolving release assets via {}", api_url);

    let response = match client
        .get(&api_url)
        .header("Accept", "application/vnd.github.v3+json")
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            log_debug!(
                MODULE,
                "Release lookup returned {} for {}",
                response.status(),
                api_url
            );
            return build;
        }
        Err(err) => {
            log_debug!(MODULE, "Release lookup failed for {}: {}", api_url, err);
            return build;
        }
    };

    let document: ReleaseDocument = match response.json().await {
        Ok(document) => document,
        Err(err) => {
            log_debug!(MODULE, "Release document did not parse: {}", err);
            return build;
        }
    };

    match best_asset(&document.assets) {
        Some(asset) if !asset.browser_download_url.is_empty() => {
            log_debug!(MODULE, "Resolved {} -> {}", page, asset.name);
            Build {
                download_link: asset.browser_download_url.clone(),
                file_name: Some(asset.name.clone()),
                ..build
            }
        }
        _ => build,
    }
}

/// Resolve a whole build set. Entries hit independent upstream endpoints
/// with no shared state, so latest and every older build run concurrently.
pub async fn resolve_build_set(client: &Client, api_base: &str, set: BuildSet) -> BuildSet {
    let older = join_all(
        set.older
            .into_iter()
            .map(|build| resolve_build(client, api_base, build)),
    );

    match set.latest {
        Some(latest) => {
            let (latest, older) = join(resolve_build(client, api_base, latest), older).await;
            BuildSet {
                latest: Some(latest),
                older,
            }
        }
        None => BuildSet {
            latest: None,
            older: older.await,
        },
    }
}
