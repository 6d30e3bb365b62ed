//! Static resource manifest
//!
//! Declares every downloadable resource the tooling knows about, grouped by
//! resource type, together with the GitHub origin they are published under.
//! The manifest is fixed at build time and never mutated.

use thiserror::Error;

/// GitHub repository the resources are published in
pub const GITHUB_REPO: &str = "Kaademos/asvs-compliance-starter-kit";

/// Raw-content base URL resources are downloaded from
pub const GITHUB_RAW_BASE: &str =
    "https://raw.githubusercontent.com/Kaademos/asvs-compliance-starter-kit/main";

/// Repository home page, shown in prompts and manual-setup instructions
pub const GITHUB_REPO_URL: &str = "https://github.com/Kaademos/asvs-compliance-starter-kit";

/// Manifest key for decision templates
pub const TEMPLATES: &str = "templates";

/// Manifest key for the ASVS core reference files
pub const CORE_REFERENCE: &str = "core_reference";

/// Manifest key for the functional requirement exports
pub const FUNCTIONAL_REQUIREMENTS: &str = "functional_requirements";

/// Manifest key for implementation pattern documents
pub const PATTERNS: &str = "patterns";

/// A resource type key was not found in the manifest
#[derive(Debug, Error)]
#[error("unknown resource type: {0}")]
pub struct UnknownResourceType(pub String);

/// One resource type: its description, remote sub-path and file list
#[derive(Debug)]
pub struct ManifestEntry {
    /// Manifest key (e.g. `templates`)
    pub key: &'static str,
    /// Human-readable description shown in status output and prompts
    pub description: &'static str,
    /// Directory below both the repository root and the cache root
    pub base_path: &'static str,
    /// Files belonging to this type, in download and report order
    pub files: &'static [&'static str],
}

impl ManifestEntry {
    /// Raw-content URL for one file of this entry
    #[must_use]
    pub fn url_for(&self, filename: &str) -> String {
        format!("{GITHUB_RAW_BASE}/{}/{filename}", self.base_path)
    }
}

/// All downloadable resources, in declaration order
pub const RESOURCE_MANIFEST: &[ManifestEntry] = &[
    ManifestEntry {
        key: TEMPLATES,
        description: "Decision templates for security documentation",
        base_path: "00-Documentation-Standards/Decision-Templates",
        files: &[
            "V6-Authentication-Strategy.md",
            "V7-Session-Management.md",
            "V8-Authorization-Rules.md",
            "V11-Cryptography-Strategy.md",
            "V14-Data-Classification.md",
            "V16-Security-Logging-Strategy.md",
        ],
    },
    ManifestEntry {
        key: CORE_REFERENCE,
        description: "ASVS core reference files (JSON/CSV)",
        base_path: "01-ASVS-Core-Reference",
        files: &[
            "ASVS-5.0-en.json",
            "ASVS-L1-Baseline.json",
            "ASVS-L1-Baseline.csv",
            "ASVS-L2-Standard.json",
            "ASVS-L2-Standard.csv",
        ],
    },
    ManifestEntry {
        key: FUNCTIONAL_REQUIREMENTS,
        description: "Functional requirements by level",
        base_path: "01-ASVS-Core-Reference/Functional-Requirements",
        files: &[
            "ASVS-Functional-Requirements-L1.json",
            "ASVS-Functional-Requirements-L2.json",
            "ASVS-Functional-Requirements-L3.json",
        ],
    },
    ManifestEntry {
        key: PATTERNS,
        description: "Implementation patterns",
        base_path: "02-Implementation-Guidance/Patterns",
        files: &[
            "Anti-CSRF-Implementation.md",
            "Input-Validation.md",
            "Secure-Access-Control-IDOR.md",
            "Secure-File-Uploads.md",
            "Security-Logging-and-Monitoring.md",
        ],
    },
];

/// Look up a manifest entry by resource type key
///
/// # Errors
///
/// Returns [`UnknownResourceType`] if the key is not in the manifest.
pub fn lookup(resource_type: &str) -> Result<&'static ManifestEntry, UnknownResourceType> {
    RESOURCE_MANIFEST
        .iter()
        .find(|entry| entry.key == resource_type)
        .ok_or_else(|| UnknownResourceType(resource_type.to_string()))
}

/// Raw-content URL for one file of a resource type
///
/// # Errors
///
/// Returns [`UnknownResourceType`] if the key is not in the manifest.
pub fn resource_url(resource_type: &str, filename: &str) -> Result<String, UnknownResourceType> {
    Ok(lookup(resource_type)?.url_for(filename))
}
