//! Tests for registry normalization and resolution.

use super::*;

#[test]
fn test_normalize_collapses_docker_hub_aliases() {
    for alias in [
        "docker.io",
        "index.docker.io",
        "registry.hub.docker.com",
        "",
        "  Docker.IO/ ",
    ] {
        assert_eq!(normalize_registry(alias), "docker.io", "alias {:?}", alias);
    }
}

#[test]
fn test_normalize_other_registries() {
    assert_eq!(normalize_registry(" Quay.io/ "), "quay.io");
    assert_eq!(normalize_registry("gcr.io"), "gcr.io");
    assert_eq!(normalize_registry("registry.k8s.io:443"), "registry.k8s.io:443");
}

#[test]
fn test_resolve_matches_normalized_source() {
    let resolver = RegistryResolver::new(vec![RegistryMapping::new(
        "index.docker.io",
        "harbor.local/dockerhub",
    )]);
    assert_eq!(resolver.resolve("docker.io"), "harbor.local/dockerhub");
    assert_eq!(resolver.resolve(""), "harbor.local/dockerhub");
    assert_eq!(resolver.resolve("quay.io"), "");
}

#[test]
fn test_resolve_first_match_wins() {
    let resolver = RegistryResolver::new(vec![
        RegistryMapping::new("quay.io", "first.example.com"),
        RegistryMapping::new("QUAY.IO/", "second.example.com"),
    ]);
    assert_eq!(resolver.resolve("quay.io"), "first.example.com");
}

#[test]
fn test_resolve_target_variants() {
    let resolver = RegistryResolver::new(vec![RegistryMapping::new("quay.io", "mirror.io/quay/")])
        .with_default_target(Some("fallback.io".to_string()));

    assert_eq!(
        resolver.resolve_target("quay.io"),
        ResolvedTarget::Mapped("mirror.io/quay".to_string())
    );
    assert_eq!(
        resolver.resolve_target("gcr.io"),
        ResolvedTarget::Default("fallback.io".to_string())
    );

    let bare = RegistryResolver::default();
    assert_eq!(bare.resolve_target("gcr.io"), ResolvedTarget::Unmapped);
}

#[test]
fn test_empty_default_target_is_ignored() {
    let resolver = RegistryResolver::default().with_default_target(Some("  ".to_string()));
    assert_eq!(resolver.resolve_target("gcr.io"), ResolvedTarget::Unmapped);
}

#[test]
fn test_target_host_and_namespace() {
    let t = ResolvedTarget::Mapped("harbor.local/dockerhub/team".to_string());
    assert_eq!(t.host(), Some("harbor.local"));
    assert_eq!(t.namespace(), Some("dockerhub/team"));
    assert!(t.is_mapped());

    let t = ResolvedTarget::Default("harbor.local".to_string());
    assert_eq!(t.host(), Some("harbor.local"));
    assert_eq!(t.namespace(), None);
    assert!(!t.is_mapped());

    assert_eq!(ResolvedTarget::Unmapped.host(), None);
}
