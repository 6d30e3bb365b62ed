//! Resource download and cache management for the ASVS compliance starter kit
//!
//! The starter kit's templates, reference files and implementation patterns
//! live in its GitHub repository. When the tooling is installed without a
//! full checkout, this crate downloads the declared resources on demand and
//! mirrors them under a per-user cache, preferring a source checkout over
//! the cache whenever one is present.

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

pub mod download;
pub mod ensure;
pub mod manifest;
pub mod resource_manager;

pub use download::{FileFetcher, HttpFetcher, DEFAULT_TIMEOUT_SECS, USER_AGENT};
pub use ensure::{
    ensure_resources, ensure_resources_with, ConsentDecision, EnsureOptions, EnsureOutcome,
};
pub use manifest::{ManifestEntry, UnknownResourceType, RESOURCE_MANIFEST};
pub use resource_manager::{AggregateOutcome, DownloadOutcome, ResourceManager, ResourceStatus};
