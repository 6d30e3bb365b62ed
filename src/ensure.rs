//! Consent-gated resource availability workflow
//!
//! The end-to-end "make sure everything is on disk" orchestration: check
//! which resource types are missing, ask the user before touching the
//! network, then download best-effort with per-file progress lines. A
//! refused prompt downloads nothing and prints manual-setup guidance
//! instead. The cache path is returned whenever downloads ran, even on
//! partial failure, because everything that did succeed remains usable.

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use crate::download::FileFetcher;
use crate::manifest::{self, ManifestEntry, GITHUB_REPO_URL, RESOURCE_MANIFEST};
use crate::resource_manager::{AggregateOutcome, ResourceManager};

/// Outcome of the interactive consent gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentDecision {
    /// The user approved downloading the missing resources
    Granted,
    /// The user answered no
    Declined,
    /// The prompt was cancelled (Esc, EOF or interrupt)
    Aborted,
}

/// Options controlling [`ensure_resources`]
#[derive(Debug)]
pub struct EnsureOptions {
    /// Resource type keys to check; `None` checks every registered type
    pub resource_types: Option<Vec<String>>,
    /// Ask before downloading anything
    pub interactive: bool,
    /// Suppress per-file progress and summary output
    pub quiet: bool,
}

impl Default for EnsureOptions {
    fn default() -> Self {
        Self {
            resource_types: None,
            interactive: true,
            quiet: false,
        }
    }
}

/// Result of an ensure run
#[derive(Debug)]
pub struct EnsureOutcome {
    /// Whether every requested file ended up available
    pub success: bool,
    /// Cache root holding whatever is available; `None` only when consent
    /// was refused and nothing was downloaded
    pub cache_dir: Option<PathBuf>,
    /// Per-type download results, empty when no download phase ran
    pub outcomes: Vec<AggregateOutcome>,
}

/// Ensure the requested resource types are available, downloading on demand
///
/// Uses the default per-user cache and, in interactive mode, a terminal
/// yes/no prompt as the consent gate.
///
/// # Errors
///
/// Returns an error if the cache location cannot be determined or a
/// requested resource type is unknown.
pub fn ensure_resources(options: &EnsureOptions) -> Result<EnsureOutcome> {
    let manager = ResourceManager::new()?;
    ensure_resources_with(&manager, options, |missing| {
        prompt_consent(missing, manager.cache_dir())
    })
}

/// [`ensure_resources`] over an explicit manager and consent source
///
/// The orchestrator is polymorphic over the consent source; tests drive it
/// with canned decisions and stub fetchers. `consent` is only invoked in
/// interactive mode and only when something is missing.
///
/// # Errors
///
/// Returns an error if a requested resource type is unknown.
pub fn ensure_resources_with<F: FileFetcher>(
    manager: &ResourceManager<F>,
    options: &EnsureOptions,
    consent: impl FnOnce(&[&'static ManifestEntry]) -> ConsentDecision,
) -> Result<EnsureOutcome> {
    let requested = requested_entries(options.resource_types.as_deref())?;
    let missing: Vec<&'static ManifestEntry> = requested
        .into_iter()
        .filter(|entry| !manager.is_available(entry.key))
        .collect();

    if missing.is_empty() {
        return Ok(EnsureOutcome {
            success: true,
            cache_dir: Some(manager.cache_dir().clone()),
            outcomes: Vec::new(),
        });
    }

    if options.interactive && consent(&missing) != ConsentDecision::Granted {
        print_manual_instructions();
        return Ok(EnsureOutcome {
            success: false,
            cache_dir: None,
            outcomes: Vec::new(),
        });
    }

    if !options.quiet {
        println!();
        println!("Downloading resources...");
        println!();
    }

    let mut all_succeeded = true;
    let mut outcomes = Vec::with_capacity(missing.len());

    for entry in missing {
        if !options.quiet {
            println!("  {}:", entry.description);
        }

        let outcome = manager.download_type(
            entry.key,
            |filename, succeeded, _message| {
                if !options.quiet {
                    print_file_line(filename, succeeded);
                }
            },
            false,
        )?;

        if !outcome.is_complete() {
            all_succeeded = false;
            if !options.quiet {
                for error in &outcome.errors {
                    println!("    {} {error}", style("Error:").red());
                }
            }
        }

        outcomes.push(outcome);
    }

    if !options.quiet {
        println!();
        if all_succeeded {
            println!("{}", style("All resources downloaded successfully.").green());
        } else {
            println!("{}", style("Some resources failed to download.").yellow());
            println!("The tooling may have limited functionality.");
        }
    }

    Ok(EnsureOutcome {
        success: all_succeeded,
        cache_dir: Some(manager.cache_dir().clone()),
        outcomes,
    })
}

/// One `[OK]` / `[FAILED]` progress line
fn print_file_line(filename: &str, succeeded: bool) {
    if succeeded {
        println!("    [{}] {filename}", style("OK").green());
    } else {
        println!("    [{}] {filename}", style("FAILED").red());
    }
}

/// Resolve requested keys against the manifest, defaulting to all types
fn requested_entries(keys: Option<&[String]>) -> Result<Vec<&'static ManifestEntry>> {
    match keys {
        None => Ok(RESOURCE_MANIFEST.iter().collect()),
        Some(keys) => keys
            .iter()
            .map(|key| Ok(manifest::lookup(key)?))
            .collect(),
    }
}

/// Present the missing resource types and read a yes/no decision
fn prompt_consent(missing: &[&'static ManifestEntry], cache_dir: &Path) -> ConsentDecision {
    println!();
    println!(
        "{}",
        style("ASVS Compliance Starter Kit - Resource Download Required").bold()
    );
    println!();
    println!("The ASVS tooling requires additional resources to function fully.");
    println!("These include templates, reference files, and documentation.");
    println!();
    println!("Resources will be downloaded from:");
    println!("  {}", style(GITHUB_REPO_URL).cyan());
    println!();
    println!("And cached locally at:");
    println!("  {}", style(cache_dir.display()).cyan());
    println!();
    println!("Resources to download:");
    for entry in missing {
        println!("  - {} ({} files)", entry.description, entry.files.len());
    }
    println!();

    match Confirm::new()
        .with_prompt("Do you want to download these resources?")
        .default(true)
        .interact_opt()
    {
        Ok(Some(true)) => ConsentDecision::Granted,
        Ok(Some(false)) => ConsentDecision::Declined,
        Ok(None) | Err(_) => ConsentDecision::Aborted,
    }
}

/// Clone-the-repository guidance shown when consent is refused
fn print_manual_instructions() {
    println!();
    println!("{}", style("Manual Setup Instructions").bold());
    println!();
    println!("To use the ASVS tooling with full functionality, clone the");
    println!("repository and run the tools from within the checkout:");
    println!();
    println!("  git clone {GITHUB_REPO_URL}.git");
    println!("  cd asvs-compliance-starter-kit");
    println!("  asvs-resources download");
    println!();
    println!("Alternatively, visit the repository for more information:");
    println!("  {GITHUB_REPO_URL}");
    println!();
}
