//! Resource path resolution command

use anyhow::{bail, Result};

use asvs_resources::manifest;
use asvs_resources::ResourceManager;

/// Print the resolved directory for a resource type, checkout first
pub struct PathCommand {
    resource_type: String,
}

impl PathCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(resource_type: String) -> Self {
        Self { resource_type }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error for unknown resource types, when the cache location
    /// cannot be determined, or when the resources are not available
    /// locally.
    pub fn execute(&self) -> Result<()> {
        manifest::lookup(&self.resource_type)?;

        let manager = ResourceManager::new()?;
        match manager.resource_path(&self.resource_type) {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => bail!(
                "resources for '{}' are not available locally; run `asvs-resources download` first",
                self.resource_type
            ),
        }
    }
}
