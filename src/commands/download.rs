//! Resource download command

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use asvs_resources::manifest::RESOURCE_MANIFEST;
use asvs_resources::{ensure_resources, EnsureOptions, ResourceManager};

/// Download missing resources, or everything again with `--force`
pub struct DownloadCommand {
    force: bool,
    quiet: bool,
}

impl DownloadCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(force: bool, quiet: bool) -> Self {
        Self { force, quiet }
    }

    /// Execute the command
    ///
    /// Exits with a nonzero status when any file fails to download.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache location cannot be determined.
    pub fn execute(&self) -> Result<()> {
        if self.force {
            return self.redownload_all();
        }

        let options = EnsureOptions {
            resource_types: None,
            interactive: false,
            quiet: self.quiet,
        };

        let outcome = ensure_resources(&options)?;
        if outcome.success {
            Ok(())
        } else {
            std::process::exit(1);
        }
    }

    /// Re-download every registered resource, cached or not
    fn redownload_all(&self) -> Result<()> {
        let manager = ResourceManager::new()?;

        let spinner = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        let mut all_succeeded = true;

        for entry in RESOURCE_MANIFEST {
            spinner.set_message(format!("Re-downloading {}...", entry.description));

            let outcome = manager.download_type(
                entry.key,
                |filename, succeeded, _message| {
                    if succeeded {
                        spinner.println(format!("  [{}] {filename}", style("OK").green()));
                    } else {
                        spinner.println(format!("  [{}] {filename}", style("FAILED").red()));
                    }
                },
                true,
            )?;

            if !outcome.is_complete() {
                all_succeeded = false;
            }
        }

        spinner.finish_and_clear();

        if all_succeeded {
            if !self.quiet {
                println!("{}", style("All resources downloaded successfully.").green());
            }
            Ok(())
        } else {
            if !self.quiet {
                println!("{}", style("Some resources failed to download.").yellow());
            }
            std::process::exit(1);
        }
    }
}
