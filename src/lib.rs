//! PBRP build resolver
//!
//! Locates release metadata for a mobile device across the official build
//! index, the global device registry, and the SourceForge mirror, and
//! normalizes the result into a single build model usable for display and
//! download.
//!
//! The entry point is [`resolver::Resolver`]: one `resolve` call walks the
//! candidate identifier casings against the official index, upgrades
//! release-page links into concrete assets, parses the per-device page for
//! maintainer/feature/install data, and falls back to the mirror feed when
//! the official index has nothing. Dropping the returned future cancels any
//! in-flight fetches; no state is shared across requests.

pub mod builds;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod mirror;
pub mod net;
pub mod registry;
pub mod release;
pub mod resolver;
pub mod tools;

pub use builds::{Build, BuildSet};
pub use device::{DeviceCandidate, DeviceIdentifier};
pub use error::FetchError;
pub use metadata::{DeviceFeature, FeatureSeverity, InstallKind, InstallMethod};
pub use mirror::MirrorOutcome;
pub use registry::{CatalogDevice, DeviceRegistry, RegistryEntry, RegistryMatch};
pub use resolver::{
    BuildSource, DeviceProfile, Endpoints, Resolution, ResolutionStatus, ResolvedDevice, Resolver,
    Stage,
};
