//! Primary build index client
//!
//! Walks the candidate casings against the official per-device build
//! index and remembers the winning candidate for the device page lookup.

mod models;

pub use models::{Build, BuildSet};

use reqwest::Client;

use crate::device::DeviceCandidate;
use crate::error::FetchError;
use crate::{log_debug, log_info, net};

const MODULE: &str = "builds";

/// Successful primary lookup: the index plus the candidate that produced it.
#[derive(Debug)]
pub struct PrimaryHit {
    pub candidate: DeviceCandidate,
    pub builds: BuildSet,
}

/// Outcome of walking every candidate.
#[derive(Debug)]
pub struct PrimaryOutcome {
    pub hit: Option<PrimaryHit>,
    /// True when at least one candidate failed at transport level rather
    /// than with a clean 404. Feeds terminal classification.
    pub saw_transport_error: bool,
}

/// URL of one candidate's build index document.
pub fn index_url(base: &str, codename: &str) -> String {
    format!("{}/builds-{}.json", base, codename)
}

/// URL of the per-device markdown page, keyed by canonical vendor.
pub fn device_page_url(base: &str, vendor: &str, codename: &str) -> String {
    format!("{}/{}/{}.md", base, vendor, codename)
}

/// Fetch one candidate's build index.
pub async fn fetch_build_index(
    client: &Client,
    base: &str,
    codename: &str,
) -> Result<BuildSet, FetchError> {
    let url = index_url(base, codename);
    log_debug!(MODULE, "Checking build index at {}", url);
    net::get_json::<BuildSet>(client, &url).await
}

/// Walk candidates in priority order, stopping at the first one whose
/// index document is valid and non-empty. A valid but empty document
/// keeps the walk going; so does any fetch failure.
pub async fn fetch_first_match(
    client: &Client,
    base: &str,
    candidates: &[DeviceCandidate],
) -> PrimaryOutcome {
    let mut saw_transport_error = false;

    for candidate in candidates {
        match fetch_build_index(client, base, &candidate.codename).await {
            Ok(builds) if !builds.is_empty() => {
                log_info!(MODULE, "Build index found for {}", candidate.codename);
                return PrimaryOutcome {
                    hit: Some(PrimaryHit {
                        candidate: candidate.clone(),
                        builds,
                    }),
                    saw_transport_error,
                };
            }
            Ok(_) => {
                log_debug!(MODULE, "Build index for {} is empty", candidate.codename);
            }
            Err(err) if err.is_not_found() => {
                log_debug!(MODULE, "No build index for {}", candidate.codename);
            }
            Err(err) => {
                log_debug!(
                    MODULE,
                    "Build index fetch for {} failed: {}",
                    candidate.codename,
                    err
                );
                saw_transport_error = true;
            }
        }
    }

    PrimaryOutcome {
        hit: None,
        saw_transport_error,
    }
}

/// Best-effort fetch of the device's markdown page. Failure only degrades
/// the profile, never an already-resolved build index.
pub async fn fetch_device_page(
    client: &Client,
    base: &str,
    vendor: &str,
    codename: &str,
) -> Option<String> {
    let url = device_page_url(base, vendor, codename);
    match net::get_text(client, &url).await {
        Ok(text) => {
            log_debug!(MODULE, "Device page fetched from {}", url);
            Some(text)
        }
        Err(err) => {
            log_debug!(MODULE, "Device page unavailable at {}: {}", url, err);
            None
        }
    }
}
