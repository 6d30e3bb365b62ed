//! Resource presence checks, downloads and path resolution
//!
//! [`ResourceManager`] owns the cache root and performs every cache-side
//! operation: presence checks, single-file and whole-type downloads with
//! ordered progress callbacks, cache clearing and local-first path
//! resolution. A source checkout of the starter kit always wins over the
//! cache, so development use never touches the network.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::download::{FileFetcher, HttpFetcher};
use crate::manifest::{self, ManifestEntry, UnknownResourceType, RESOURCE_MANIFEST};

/// Directory that marks a source checkout of the starter kit
const CHECKOUT_MARKER: &str = "01-ASVS-Core-Reference";

/// Outcome of a single file download attempt
#[derive(Debug)]
pub struct DownloadOutcome {
    /// File the attempt was for
    pub filename: String,
    /// Whether the file is now present in the cache
    pub succeeded: bool,
    /// Human-readable status line for reporting
    pub message: String,
}

/// Accumulated result of downloading one resource type
#[derive(Debug)]
pub struct AggregateOutcome {
    /// Manifest key the downloads were for
    pub resource_type: &'static str,
    /// Number of files that succeeded (or were already cached)
    pub succeeded: usize,
    /// Number of files attempted
    pub total: usize,
    /// Failure messages, in manifest order
    pub errors: Vec<String>,
}

impl AggregateOutcome {
    /// Whether every file of the type ended up cached
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Availability row for one resource type, in manifest order
#[derive(Debug)]
pub struct ResourceStatus {
    /// Description from the manifest entry
    pub description: &'static str,
    /// Whether every file of the type is cached
    pub available: bool,
}

/// Manages downloading and caching of starter-kit resources
pub struct ResourceManager<F: FileFetcher = HttpFetcher> {
    cache_dir: PathBuf,
    checkout_root: Option<PathBuf>,
    fetcher: F,
}

impl ResourceManager<HttpFetcher> {
    /// Create a manager over the default per-user cache directory
    ///
    /// The cache lives at `~/.asvs-compliance/resources`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `HOME` environment variable is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            cache_dir: default_cache_dir()?,
            checkout_root: find_checkout_root(),
            fetcher: HttpFetcher::default(),
        })
    }

    /// Create a manager over a specific cache directory
    #[must_use]
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            checkout_root: find_checkout_root(),
            fetcher: HttpFetcher::default(),
        }
    }
}

impl<F: FileFetcher> ResourceManager<F> {
    /// Create a manager with explicit roots and fetcher
    ///
    /// This is the construction seam tests use to substitute stub fetchers
    /// and controlled checkout roots.
    #[must_use]
    pub const fn with_fetcher(
        cache_dir: PathBuf,
        checkout_root: Option<PathBuf>,
        fetcher: F,
    ) -> Self {
        Self {
            cache_dir,
            checkout_root,
            fetcher,
        }
    }

    /// Cache root every resource type is mirrored under
    #[must_use]
    pub const fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Cache path for one file of a resource type
    ///
    /// Pure path concatenation; no filesystem access.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownResourceType`] if the key is not in the manifest.
    pub fn cache_path(
        &self,
        resource_type: &str,
        filename: &str,
    ) -> Result<PathBuf, UnknownResourceType> {
        let entry = manifest::lookup(resource_type)?;
        Ok(self.cache_dir.join(entry.base_path).join(filename))
    }

    /// Whether one file of a resource type is present in the cache
    ///
    /// # Errors
    ///
    /// Returns [`UnknownResourceType`] if the key is not in the manifest.
    pub fn is_cached(&self, resource_type: &str, filename: &str) -> Result<bool, UnknownResourceType> {
        Ok(self.cache_path(resource_type, filename)?.is_file())
    }

    /// Whether every file of a resource type is present in the cache
    ///
    /// Unknown keys are simply not available.
    #[must_use]
    pub fn is_available(&self, resource_type: &str) -> bool {
        manifest::lookup(resource_type).is_ok_and(|entry| self.entry_available(entry))
    }

    fn entry_available(&self, entry: &ManifestEntry) -> bool {
        let base = self.cache_dir.join(entry.base_path);
        entry.files.iter().all(|filename| base.join(filename).is_file())
    }

    /// Download a single resource file
    ///
    /// A file that is already cached is reported as a success without any
    /// network activity unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownResourceType`] if the key is not in the manifest.
    /// Transfer failures are reported through the outcome, never as errors.
    pub fn download_one(
        &self,
        resource_type: &str,
        filename: &str,
        force: bool,
    ) -> Result<DownloadOutcome, UnknownResourceType> {
        let entry = manifest::lookup(resource_type)?;
        Ok(self.download_file(entry, filename, force))
    }

    fn download_file(&self, entry: &ManifestEntry, filename: &str, force: bool) -> DownloadOutcome {
        let dest = self.cache_dir.join(entry.base_path).join(filename);

        if !force && dest.is_file() {
            return DownloadOutcome {
                filename: filename.to_owned(),
                succeeded: true,
                message: format!("Already cached: {filename}"),
            };
        }

        let url = entry.url_for(filename);
        if self.fetcher.fetch(&url, &dest) {
            DownloadOutcome {
                filename: filename.to_owned(),
                succeeded: true,
                message: format!("Downloaded: {filename}"),
            }
        } else {
            DownloadOutcome {
                filename: filename.to_owned(),
                succeeded: false,
                message: format!("Failed to download: {filename}"),
            }
        }
    }

    /// Download every file of a resource type, in manifest order
    ///
    /// `progress` is invoked synchronously after each attempt with
    /// `(filename, succeeded, message)`, in the order files are declared.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownResourceType`] if the key is not in the manifest.
    pub fn download_type(
        &self,
        resource_type: &str,
        progress: impl FnMut(&str, bool, &str),
        force: bool,
    ) -> Result<AggregateOutcome, UnknownResourceType> {
        let entry = manifest::lookup(resource_type)?;
        Ok(self.download_entry(entry, progress, force))
    }

    fn download_entry(
        &self,
        entry: &'static ManifestEntry,
        mut progress: impl FnMut(&str, bool, &str),
        force: bool,
    ) -> AggregateOutcome {
        let mut outcome = AggregateOutcome {
            resource_type: entry.key,
            succeeded: 0,
            total: entry.files.len(),
            errors: Vec::new(),
        };

        for filename in entry.files {
            let result = self.download_file(entry, filename, force);
            progress(&result.filename, result.succeeded, &result.message);

            if result.succeeded {
                outcome.succeeded += 1;
            } else {
                outcome.errors.push(result.message);
            }
        }

        outcome
    }

    /// Download every registered resource type, in declaration order
    ///
    /// `progress` is invoked with `(resource_type, filename, succeeded,
    /// message)` after each attempt. Outcomes come back in manifest
    /// declaration order.
    #[must_use = "outcomes report which files failed"]
    pub fn download_all(
        &self,
        mut progress: impl FnMut(&'static str, &str, bool, &str),
        force: bool,
    ) -> Vec<AggregateOutcome> {
        RESOURCE_MANIFEST
            .iter()
            .map(|entry| {
                self.download_entry(
                    entry,
                    |filename, succeeded, message| progress(entry.key, filename, succeeded, message),
                    force,
                )
            })
            .collect()
    }

    /// Remove the whole cache directory tree
    ///
    /// Returns `false` on filesystem failure; a missing cache counts as
    /// cleared.
    #[must_use]
    pub fn clear_cache(&self) -> bool {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir).is_ok()
        } else {
            true
        }
    }

    /// Resolve the directory for a resource type, checkout first
    ///
    /// A source checkout of the starter kit takes priority over the cache;
    /// the cache directory is returned only if it exists on disk. `None`
    /// means the resources are not available locally at all.
    #[must_use]
    pub fn resource_path(&self, resource_type: &str) -> Option<PathBuf> {
        let entry = manifest::lookup(resource_type).ok()?;

        if let Some(root) = &self.checkout_root {
            let local = root.join(entry.base_path);
            if local.exists() {
                return Some(local);
            }
        }

        let cached = self.cache_dir.join(entry.base_path);
        if cached.exists() {
            return Some(cached);
        }

        None
    }

    /// Availability of every resource type, in declaration order
    #[must_use]
    pub fn status(&self) -> Vec<ResourceStatus> {
        RESOURCE_MANIFEST
            .iter()
            .map(|entry| ResourceStatus {
                description: entry.description,
                available: self.entry_available(entry),
            })
            .collect()
    }

    /// Cache directory the decision templates are mirrored under
    #[must_use]
    pub fn templates_path(&self) -> PathBuf {
        self.type_dir(manifest::TEMPLATES)
    }

    /// Cache directory the core reference files are mirrored under
    #[must_use]
    pub fn core_reference_path(&self) -> PathBuf {
        self.type_dir(manifest::CORE_REFERENCE)
    }

    fn type_dir(&self, key: &'static str) -> PathBuf {
        let entry = manifest::lookup(key).expect("key is declared in the manifest");
        self.cache_dir.join(entry.base_path)
    }
}

/// Default per-user cache directory, `~/.asvs-compliance/resources`
fn default_cache_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".asvs-compliance").join("resources"))
}

/// Find a source checkout of the starter kit, if the tool runs inside one
fn find_checkout_root() -> Option<PathBuf> {
    // Running from a cargo target directory inside the checkout
    if let Ok(exe_path) = env::current_exe() {
        if let Some(target_dir) = exe_path.parent() {
            let checkout = target_dir.parent().and_then(Path::parent);
            if let Some(root) = checkout {
                if root.join(CHECKOUT_MARKER).exists() {
                    return Some(root.to_path_buf());
                }
            }
        }
    }

    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let root = PathBuf::from(manifest_dir);
        if root.join(CHECKOUT_MARKER).exists() {
            return Some(root);
        }
    }

    None
}
