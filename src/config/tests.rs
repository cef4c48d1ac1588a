//! Tests for config functionality.

use crate::config::{MappingEntry, RelocConfig};
use crate::registry::ResolvedTarget;
use crate::strategy::PathStrategyKind;
use crate::test_support::write_file;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = RelocConfig::default();

    assert!(config.include_patterns.is_empty());
    assert!(config.exclude_patterns.is_empty());
    assert!(config.source_registries.is_empty());
    assert!(config.exclude_registries.is_empty());
    assert!(!config.strict);
    assert_eq!(config.path_strategy, PathStrategyKind::PrefixSourceRegistry);
    assert!(config.target_registry.is_none());
    assert!(config.registry_mappings.is_empty());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = RelocConfig::from_yaml("").unwrap();
    assert_eq!(config, RelocConfig::default());
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
include_patterns: ["**.image"]
exclude_patterns: ["sidecar.*"]
source_registries: [docker.io, quay.io]
exclude_registries: [gcr.io]
strict: true
path_strategy: flat
target_registry: harbor.local
registry_mappings:
  - source: quay.io
    target: harbor.local/quay
  - source: registry.k8s.io
    target: harbor.local/k8s
    enabled: false
"#;
    let config = RelocConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.include_patterns, vec!["**.image"]);
    assert_eq!(config.exclude_patterns, vec!["sidecar.*"]);
    assert_eq!(config.source_registries, vec!["docker.io", "quay.io"]);
    assert_eq!(config.exclude_registries, vec!["gcr.io"]);
    assert!(config.strict);
    assert_eq!(config.path_strategy, PathStrategyKind::Flat);
    assert_eq!(config.target_registry.as_deref(), Some("harbor.local"));
    assert_eq!(config.registry_mappings.len(), 2);
    assert!(config.registry_mappings[0].enabled);
    assert!(!config.registry_mappings[1].enabled);
}

#[test]
fn test_unknown_fields_ignored() {
    let config = RelocConfig::from_yaml("strict: true\nfuture_option: 3\n").unwrap();
    assert!(config.strict);
}

#[test]
fn test_legacy_mapping_form() {
    let yaml = r#"
registry_mappings:
  docker.io: harbor.local/dockerhub
  quay.io: harbor.local/quay
"#;
    let config = RelocConfig::from_yaml(yaml).unwrap();
    assert_eq!(
        config.registry_mappings,
        vec![
            MappingEntry::new("docker.io", "harbor.local/dockerhub"),
            MappingEntry::new("quay.io", "harbor.local/quay"),
        ]
    );
}

#[test]
fn test_legacy_mapping_keeps_file_order() {
    let yaml = r#"
registry_mappings:
  index.docker.io: mirror.local/hub
  docker.io: harbor.local/dockerhub
"#;
    let config = RelocConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.registry_mappings[0].source, "index.docker.io");
    assert_eq!(config.registry_mappings[1].source, "docker.io");

    // Both normalize to Docker Hub; the entry written first wins.
    assert_eq!(
        config.resolver().resolve_target("docker.io"),
        ResolvedTarget::Mapped("mirror.local/hub".to_string())
    );
}

#[test]
fn test_unknown_strategy_rejected() {
    let err = RelocConfig::from_yaml("path_strategy: nested\n").unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
}

#[test]
fn test_validate_empty_source_or_target() {
    let err = RelocConfig::from_yaml("registry_mappings:\n  - source: \"\"\n    target: x.io\n")
        .unwrap_err();
    assert!(err.to_string().contains("empty source"));

    let err = RelocConfig::from_yaml("registry_mappings:\n  - source: quay.io\n    target: \" \"\n")
        .unwrap_err();
    assert!(err.to_string().contains("empty target"));
}

#[test]
fn test_validate_target_whitespace() {
    let err =
        RelocConfig::from_yaml("registry_mappings:\n  - source: quay.io\n    target: harbor local\n")
            .unwrap_err();
    assert!(err.to_string().contains("whitespace"));

    let err = RelocConfig::from_yaml("target_registry: \"harbor .local\"\n").unwrap_err();
    assert!(err.to_string().contains("target_registry"));
}

#[test]
fn test_validate_invalid_glob() {
    let err = RelocConfig::from_yaml("include_patterns: [\"app.[\"]\n").unwrap_err();
    assert!(err.to_string().contains("app.["));
    assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
}

#[test]
fn test_resolver_skips_disabled_entries() {
    let yaml = r#"
target_registry: fallback.local
registry_mappings:
  - source: quay.io
    target: harbor.local/quay
    enabled: false
  - source: quay.io
    target: mirror.local/quay
"#;
    let resolver = RelocConfig::from_yaml(yaml).unwrap().resolver();
    assert_eq!(
        resolver.resolve_target("quay.io"),
        ResolvedTarget::Mapped("mirror.local/quay".to_string())
    );
    assert_eq!(
        resolver.resolve_target("gcr.io"),
        ResolvedTarget::Default("fallback.local".to_string())
    );
}

#[test]
fn test_load_from_file_and_round_trip() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "reloc.yaml",
        "strict: true\nregistry_mappings:\n  quay.io: harbor.local/quay\n",
    );
    let config = RelocConfig::load(dir.path().join("reloc.yaml")).unwrap();
    assert!(config.strict);

    let yaml = config.to_yaml().unwrap();
    let reparsed = RelocConfig::from_yaml(&yaml).unwrap();
    assert_eq!(reparsed, config);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = RelocConfig::load(dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
