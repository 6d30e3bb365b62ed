//! Cache clearing command

use anyhow::Result;
use console::style;

use asvs_resources::ResourceManager;

/// Remove the resource cache directory tree
pub struct ClearCommand;

impl ClearCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the cache location cannot be determined.
    pub fn execute() -> Result<()> {
        let manager = ResourceManager::new()?;

        if manager.clear_cache() {
            println!("{}", style("Cache cleared successfully.").green());
            Ok(())
        } else {
            println!("{}", style("Failed to clear cache.").red());
            std::process::exit(1);
        }
    }
}
