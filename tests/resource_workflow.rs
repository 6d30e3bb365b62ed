//! Integration tests for resource caching and the ensure workflow

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;

use asvs_resources::manifest::{self, RESOURCE_MANIFEST};
use asvs_resources::{
    ensure_resources_with, ConsentDecision, EnsureOptions, FileFetcher, ResourceManager,
};

/// Fetcher that writes a stub body, counts calls, and fails on demand
struct StubFetcher {
    calls: Rc<Cell<usize>>,
    fail_when: Box<dyn Fn(&str) -> bool>,
}

impl StubFetcher {
    fn succeeding(calls: &Rc<Cell<usize>>) -> Self {
        Self {
            calls: Rc::clone(calls),
            fail_when: Box::new(|_| false),
        }
    }

    fn failing(calls: &Rc<Cell<usize>>) -> Self {
        Self {
            calls: Rc::clone(calls),
            fail_when: Box::new(|_| true),
        }
    }

    fn failing_when(calls: &Rc<Cell<usize>>, pred: impl Fn(&str) -> bool + 'static) -> Self {
        Self {
            calls: Rc::clone(calls),
            fail_when: Box::new(pred),
        }
    }
}

impl FileFetcher for StubFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> bool {
        self.calls.set(self.calls.get() + 1);
        if (self.fail_when)(url) {
            return false;
        }
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(dest, b"stub resource body").unwrap();
        true
    }
}

fn quiet_options(interactive: bool) -> EnsureOptions {
    EnsureOptions {
        resource_types: None,
        interactive,
        quiet: true,
    }
}

fn populate_cache(cache_dir: PathBuf) {
    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache_dir, None, StubFetcher::succeeding(&calls));
    let outcomes = manager.download_all(|_, _, _, _| {}, false);
    assert!(outcomes.iter().all(|outcome| outcome.is_complete()));
}

fn manifest_file_count() -> usize {
    RESOURCE_MANIFEST.iter().map(|entry| entry.files.len()).sum()
}

#[test]
fn test_ensure_satisfied_skips_prompt_and_network() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");
    populate_cache(cache.clone());

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache.clone(), None, StubFetcher::failing(&calls));

    let outcome = ensure_resources_with(&manager, &quiet_options(true), |_| {
        panic!("consent must not be prompted when everything is available")
    })
    .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.cache_dir, Some(cache));
    assert!(outcome.outcomes.is_empty());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_ensure_noninteractive_reports_every_failure_once() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache.clone(), None, StubFetcher::failing(&calls));

    let outcome = ensure_resources_with(&manager, &quiet_options(false), |_| {
        panic!("consent must not be prompted in non-interactive mode")
    })
    .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.cache_dir, Some(cache));
    assert_eq!(calls.get(), manifest_file_count());

    let errors: Vec<String> = outcome
        .outcomes
        .iter()
        .flat_map(|outcome| outcome.errors.clone())
        .collect();
    assert_eq!(errors.len(), manifest_file_count());

    for entry in RESOURCE_MANIFEST {
        for filename in entry.files {
            let message = format!("Failed to download: {filename}");
            let hits = errors.iter().filter(|error| **error == message).count();
            assert_eq!(hits, 1, "expected exactly one error for {filename}");
        }
    }
}

#[test]
fn test_ensure_declined_downloads_nothing() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache, None, StubFetcher::succeeding(&calls));

    let options = EnsureOptions {
        resource_types: Some(vec!["templates".to_string()]),
        interactive: true,
        quiet: true,
    };

    let outcome = ensure_resources_with(&manager, &options, |missing| {
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].key, "templates");
        ConsentDecision::Declined
    })
    .unwrap();

    assert!(!outcome.success);
    assert!(outcome.cache_dir.is_none());
    assert!(outcome.outcomes.is_empty());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_ensure_aborted_is_treated_as_refusal() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache, None, StubFetcher::succeeding(&calls));

    let outcome =
        ensure_resources_with(&manager, &quiet_options(true), |_| ConsentDecision::Aborted)
            .unwrap();

    assert!(!outcome.success);
    assert!(outcome.cache_dir.is_none());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_ensure_downloads_only_missing_types() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let seed_calls = Rc::new(Cell::new(0));
    let seeder =
        ResourceManager::with_fetcher(cache.clone(), None, StubFetcher::succeeding(&seed_calls));
    seeder.download_type("templates", |_, _, _| {}, false).unwrap();
    assert_eq!(seed_calls.get(), 6);

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache, None, StubFetcher::succeeding(&calls));

    let outcome = ensure_resources_with(&manager, &quiet_options(false), |_| {
        panic!("consent must not be prompted in non-interactive mode")
    })
    .unwrap();

    assert!(outcome.success);
    assert_eq!(calls.get(), manifest_file_count() - 6);
    assert_eq!(outcome.outcomes.len(), RESOURCE_MANIFEST.len() - 1);
    assert!(outcome
        .outcomes
        .iter()
        .all(|outcome| outcome.resource_type != "templates"));
}

#[test]
fn test_ensure_rejects_unknown_resource_type() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache, None, StubFetcher::succeeding(&calls));

    let options = EnsureOptions {
        resource_types: Some(vec!["no_such_type".to_string()]),
        interactive: false,
        quiet: true,
    };

    let result = ensure_resources_with(&manager, &options, |_| ConsentDecision::Granted);
    assert!(result.is_err());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_download_type_partial_failure_in_manifest_order() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let third = "V8-Authorization-Rules.md";
    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(
        cache,
        None,
        StubFetcher::failing_when(&calls, move |url| url.ends_with(third)),
    );

    let mut seen = Vec::new();
    let outcome = manager
        .download_type(
            "templates",
            |filename, succeeded, _| seen.push((filename.to_string(), succeeded)),
            false,
        )
        .unwrap();

    assert_eq!(outcome.succeeded, 5);
    assert_eq!(outcome.total, 6);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains(third));

    let entry = manifest::lookup("templates").unwrap();
    let expected: Vec<(String, bool)> = entry
        .files
        .iter()
        .map(|filename| ((*filename).to_string(), *filename != third))
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_download_all_covers_registry_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(cache, None, StubFetcher::succeeding(&calls));

    let mut seen = Vec::new();
    let outcomes = manager.download_all(
        |resource_type, filename, _, _| seen.push((resource_type, filename.to_string())),
        false,
    );

    let expected: Vec<(&str, String)> = RESOURCE_MANIFEST
        .iter()
        .flat_map(|entry| {
            entry
                .files
                .iter()
                .map(|filename| (entry.key, (*filename).to_string()))
        })
        .collect();
    assert_eq!(seen, expected);

    assert_eq!(outcomes.len(), RESOURCE_MANIFEST.len());
    assert!(outcomes.iter().all(|outcome| outcome.is_complete()));
    let keys: Vec<&str> = outcomes.iter().map(|outcome| outcome.resource_type).collect();
    let manifest_keys: Vec<&str> = RESOURCE_MANIFEST.iter().map(|entry| entry.key).collect();
    assert_eq!(keys, manifest_keys);
}

#[test]
fn test_local_first_resolution() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");
    let checkout = dir.path().join("checkout");

    let templates_base = "00-Documentation-Standards/Decision-Templates";
    fs::create_dir_all(checkout.join(templates_base)).unwrap();

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(
        cache.clone(),
        Some(checkout.clone()),
        StubFetcher::succeeding(&calls),
    );

    // Cache copies exist for templates and patterns
    manager.download_type("templates", |_, _, _| {}, false).unwrap();
    manager.download_type("patterns", |_, _, _| {}, false).unwrap();

    // Checkout wins over the cache when both exist
    assert_eq!(
        manager.resource_path("templates"),
        Some(checkout.join(templates_base))
    );

    // Cache is the fallback when the checkout has no copy
    assert_eq!(
        manager.resource_path("patterns"),
        Some(cache.join("02-Implementation-Guidance/Patterns"))
    );

    // Nothing anywhere resolves to nothing
    assert!(manager.resource_path("functional_requirements").is_none());
    assert!(manager.resource_path("no_such_type").is_none());
}

#[test]
fn test_clear_cache_keeps_checkout_resolution() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache");
    let checkout = dir.path().join("checkout");

    let templates_base = "00-Documentation-Standards/Decision-Templates";
    fs::create_dir_all(checkout.join(templates_base)).unwrap();

    let calls = Rc::new(Cell::new(0));
    let manager = ResourceManager::with_fetcher(
        cache,
        Some(checkout.clone()),
        StubFetcher::succeeding(&calls),
    );

    manager.download_type("templates", |_, _, _| {}, false).unwrap();
    manager.download_type("patterns", |_, _, _| {}, false).unwrap();
    assert!(manager.is_available("templates"));

    assert!(manager.clear_cache());

    // The cache no longer satisfies anything
    assert!(!manager.is_available("templates"));
    assert!(!manager.is_available("patterns"));
    assert!(manager.resource_path("patterns").is_none());

    // A checkout copy is independent of the cache
    assert_eq!(
        manager.resource_path("templates"),
        Some(checkout.join(templates_base))
    );
}
