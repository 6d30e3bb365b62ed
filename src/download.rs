//! Single-file download support
//!
//! One blocking HTTP GET per file, written to disk through a temporary file
//! so a failed or interrupted transfer never leaves a partial file at the
//! destination path. Every failure mode collapses to `false` at this
//! boundary; callers see a boolean, never an error.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use ureq::Agent;

/// Request timeout applied to every fetch, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Identifying User-Agent header sent with every request
pub const USER_AGENT: &str = "ASVS-Compliance-CLI";

/// Transfers a single remote file to a destination path.
///
/// The resource manager is generic over this trait so tests can substitute
/// stub fetchers for the real HTTP client.
pub trait FileFetcher {
    /// Fetch `url` into `dest`, returning whether the transfer fully
    /// succeeded. Implementations must not leave a partial file at `dest`.
    fn fetch(&self, url: &str, dest: &Path) -> bool;
}

/// Blocking HTTP fetcher backed by a preconfigured [`ureq::Agent`]
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> bool {
        transfer(&self.agent, url, dest).is_ok()
    }
}

/// Download `url` and move the body into place at `dest`.
///
/// Network failures, HTTP error statuses and filesystem errors all surface
/// as `Err` here and collapse to `false` in [`FileFetcher::fetch`]. The body
/// is staged next to the destination so the final rename stays on one
/// filesystem.
fn transfer(agent: &Agent, url: &str, dest: &Path) -> Result<()> {
    let parent = dest
        .parent()
        .context("destination path has no parent directory")?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create directory: {}", parent.display()))?;

    let response = agent
        .get(url)
        .call()
        .with_context(|| format!("failed to fetch {url}"))?;

    let mut body = response.into_body();
    let content = body.read_to_vec().context("failed to read response body")?;

    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to stage download in {}", parent.display()))?;
    staged
        .write_all(&content)
        .context("failed to write staged download")?;
    staged
        .persist(dest)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to move download into place: {}", dest.display()))?;

    Ok(())
}
