//! Resource cache status command

use anyhow::Result;
use console::{style, Emoji};

use asvs_resources::ResourceManager;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "");

/// Show the cache directory and per-type availability
pub struct StatusCommand;

impl StatusCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the cache location cannot be determined.
    pub fn execute() -> Result<()> {
        let manager = ResourceManager::new()?;

        println!(
            "Cache directory: {}",
            style(manager.cache_dir().display()).cyan()
        );
        println!();

        for row in manager.status() {
            if row.available {
                println!("  {CHECK}{}: {}", row.description, style("Available").green());
            } else {
                println!("  {CROSS}{}: {}", row.description, style("Missing").red());
            }
        }

        Ok(())
    }
}
