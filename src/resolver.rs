//! Resolution pipeline
//!
//! One short-lived task per request: registry, candidate walk, release
//! resolution and device page in parallel, then the mirror as last
//! resort. Dropping the returned future cancels any in-flight fetches;
//! nothing is shared across requests (the registry is refetched per
//! request so the answer always reflects the latest document).

use futures_util::future::join;
use reqwest::Client;
use serde::Serialize;

use crate::builds::{self, BuildSet};
use crate::device::DeviceIdentifier;
use crate::error::FetchError;
use crate::metadata::{self, DeviceFeature, InstallMethod};
use crate::mirror::{self, MirrorOutcome};
use crate::registry::{self, RegistryMatch};
use crate::{config, log_info, net, release};

const MODULE: &str = "resolver";

/// Where the winning build set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildSource {
    Primary,
    Mirror,
}

/// Pipeline stage at which a terminal source failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Primary,
    Mirror,
}

/// Presentation-ready profile assembled from the registry and device page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceProfile {
    pub title: String,
    pub maintainer: String,
    pub maintainer_handle: Option<String>,
    pub features: Vec<DeviceFeature>,
    pub install_methods: Vec<InstallMethod>,
}

/// A successful resolution.
#[derive(Debug, Serialize)]
pub struct ResolvedDevice {
    pub builds: BuildSet,
    pub profile: DeviceProfile,
    pub source: BuildSource,
}

/// Terminal classification. Exactly one per request.
#[derive(Debug, Serialize)]
pub enum ResolutionStatus {
    Resolved(ResolvedDevice),
    /// The registry lists the device but no source has a build index.
    /// Carries the registry-derived profile for display.
    OfficialIndexMissing { profile: DeviceProfile },
    NotSupported,
    /// A source failed in a way that leaves support undetermined.
    SourceError { stage: Stage },
}

/// The answer to one resolution request.
#[derive(Debug, Serialize)]
pub struct Resolution {
    pub device: DeviceIdentifier,
    pub status: ResolutionStatus,
}

/// Endpoint set used by every client; overridable for tests.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub registry_url: String,
    pub build_index_base: String,
    pub device_page_base: String,
    pub release_api_base: String,
    pub mirror_feed_base: String,
    pub mirror_files_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            registry_url: config::urls::DEVICE_REGISTRY.into(),
            build_index_base: config::urls::BUILD_INDEX_BASE.into(),
            device_page_base: config::urls::DEVICE_PAGE_BASE.into(),
            release_api_base: config::urls::RELEASE_API_BASE.into(),
            mirror_feed_base: config::urls::MIRROR_FEED_BASE.into(),
            mirror_files_base: config::urls::MIRROR_FILES_BASE.into(),
        }
    }
}

/// Stateless resolution front end owning the injectable HTTP client.
pub struct Resolver {
    client: Client,
    endpoints: Endpoints,
}

impl Resolver {
    /// Resolver against the production endpoints.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: net::client()?,
            endpoints: Endpoints::default(),
        })
    }

    /// Resolver with explicit transport and endpoints.
    pub fn with_endpoints(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// The mirror directory a presentation layer can offer for manual
    /// browsing when resolution ends without builds.
    pub fn browse_url(&self, device: &DeviceIdentifier) -> String {
        mirror::browse_url(
            &self.endpoints.mirror_files_base,
            &device.codename.to_lowercase(),
        )
    }

    /// Resolve one device identifier into a terminal status.
    pub async fn resolve(&self, device: &DeviceIdentifier) -> Resolution {
        let status = self.resolve_status(device).await;
        Resolution {
            device: device.clone(),
            status,
        }
    }

    async fn resolve_status(&self, device: &DeviceIdentifier) -> ResolutionStatus {
        let candidates = device.candidates();
        log_info!(
            MODULE,
            "Resolving {} ({} candidate casings)",
            device,
            candidates.len()
        );

        // Advisory registry lookup: canonical vendor plus display fields.
        let registry = registry::fetch_registry(&self.client, &self.endpoints.registry_url).await;
        let registry_match = registry
            .as_ref()
            .and_then(|r| r.lookup(&device.codename))
            .cloned();
        let canonical_vendor = registry_match
            .as_ref()
            .map(|m| m.vendor.clone())
            .unwrap_or_else(|| device.vendor.to_lowercase());

        let outcome = builds::fetch_first_match(
            &self.client,
            &self.endpoints.build_index_base,
            &candidates,
        )
        .await;

        if let Some(hit) = outcome.hit {
            // Release upgrades and the device page hit independent
            // endpoints; run them together.
            let (build_set, page) = join(
                release::resolve_build_set(
                    &self.client,
                    &self.endpoints.release_api_base,
                    hit.builds,
                ),
                builds::fetch_device_page(
                    &self.client,
                    &self.endpoints.device_page_base,
                    &canonical_vendor,
                    &hit.candidate.codename,
                ),
            )
            .await;

            let profile = build_profile(registry_match.as_ref(), page.as_deref());
            log_info!(MODULE, "Resolved {} from the official index", device);
            return ResolutionStatus::Resolved(ResolvedDevice {
                builds: build_set,
                profile,
                source: BuildSource::Primary,
            });
        }

        let mirror_outcome = mirror::check_mirror(
            &self.client,
            &self.endpoints.mirror_feed_base,
            &self.endpoints.mirror_files_base,
            &device.codename.to_lowercase(),
        )
        .await;

        match mirror_outcome {
            MirrorOutcome::Found(builds) => {
                // No device page on the mirror path: profile defaults plus
                // the generic install method.
                let profile = build_profile(registry_match.as_ref(), None);
                log_info!(MODULE, "Resolved {} from the mirror", device);
                ResolutionStatus::Resolved(ResolvedDevice {
                    builds,
                    profile,
                    source: BuildSource::Mirror,
                })
            }
            MirrorOutcome::Empty if registry_match.is_some() => {
                log_info!(MODULE, "{} is listed but has no build index", device);
                ResolutionStatus::OfficialIndexMissing {
                    profile: build_profile(registry_match.as_ref(), None),
                }
            }
            MirrorOutcome::Empty | MirrorOutcome::NotFound => {
                // With only transport noise on the primary walk, "absent"
                // was never actually observed there.
                if outcome.saw_transport_error {
                    log_info!(MODULE, "{} undetermined: primary source unreachable", device);
                    ResolutionStatus::SourceError {
                        stage: Stage::Primary,
                    }
                } else {
                    log_info!(MODULE, "{} is not supported", device);
                    ResolutionStatus::NotSupported
                }
            }
            MirrorOutcome::Unreachable => ResolutionStatus::SourceError {
                stage: Stage::Mirror,
            },
        }
    }
}

/// Profile from whatever sources survived: registry fields seed the
/// defaults, the device page overrides them when present.
fn build_profile(registry: Option<&RegistryMatch>, page: Option<&str>) -> DeviceProfile {
    let mut profile = DeviceProfile::default();

    if let Some(hit) = registry {
        if let Some(name) = &hit.entry.name {
            profile.title = name.clone();
        }
        if let Some(maintainer) = &hit.entry.maintainer {
            profile.maintainer = maintainer.clone();
        }
    }

    match page {
        Some(content) => {
            let maintainer = metadata::maintainer(content);
            if !maintainer.is_empty() {
                profile.maintainer = maintainer;
            }
            let title = metadata::page_title(content);
            if !title.is_empty() {
                profile.title = title;
            }
            profile.features = metadata::parse_features(content);
            profile.install_methods = metadata::parse_install_methods(content);
        }
        None => {
            profile.install_methods = metadata::parse_install_methods("");
        }
    }

    if profile.maintainer.is_empty() {
        profile.maintainer = "unknown".into();
    }
    profile.maintainer_handle = metadata::maintainer_handle(&profile.maintainer);
    profile
}
