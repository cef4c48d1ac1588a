//! Tests for image reference parsing.

use super::*;

const DIGEST: &str = "sha256:0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

#[test]
fn test_parse_bare_name_defaults() {
    let r = parse_image_reference("nginx").unwrap();
    assert_eq!(r.registry, "docker.io");
    assert_eq!(r.repository, "nginx");
    assert_eq!(r.tag.as_deref(), Some("latest"));
    assert!(!r.explicit_registry);
    assert!(r.digest.is_none());
}

#[test]
fn test_parse_name_with_tag() {
    let r = parse_image_reference("nginx:1.25").unwrap();
    assert_eq!(r.registry, "docker.io");
    assert_eq!(r.repository, "nginx");
    assert_eq!(r.tag.as_deref(), Some("1.25"));
    assert!(!r.explicit_registry);
}

#[test]
fn test_explicit_docker_hub_registry() {
    let r = parse_image_reference("docker.io/library/nginx:latest").unwrap();
    assert_eq!(r.registry, "docker.io");
    assert_eq!(r.repository, "library/nginx");
    assert!(r.explicit_registry);
}

#[test]
fn test_parse_domain_with_port() {
    let r = parse_image_reference("quay.io:443/prometheus/node-exporter:v1.7.0").unwrap();
    assert_eq!(r.registry, "quay.io:443");
    assert_eq!(r.repository, "prometheus/node-exporter");
    assert_eq!(r.tag.as_deref(), Some("v1.7.0"));
}

#[test]
fn test_parse_localhost_domain() {
    let r = parse_image_reference("localhost/app").unwrap();
    assert_eq!(r.registry, "localhost");
    assert_eq!(r.repository, "app");

    let r = parse_image_reference("localhost:5000/team/app:dev").unwrap();
    assert_eq!(r.registry, "localhost:5000");
    assert_eq!(r.repository, "team/app");
    assert_eq!(r.tag.as_deref(), Some("dev"));
}

#[test]
fn test_first_component_without_dot_is_path() {
    let r = parse_image_reference("bitnami/redis:7.2").unwrap();
    assert_eq!(r.registry, "docker.io");
    assert_eq!(r.repository, "bitnami/redis");
}

#[test]
fn test_repository_kept_as_written() {
    let r = parse_image_reference("docker.io/library/nginx:1").unwrap();
    assert_eq!(r.repository, "library/nginx");
    let r = parse_image_reference("docker.io/nginx:1").unwrap();
    assert_eq!(r.repository, "nginx");
}

#[test]
fn test_parse_digest() {
    let r = parse_image_reference(&format!("ghcr.io/org/app@{}", DIGEST)).unwrap();
    assert_eq!(r.registry, "ghcr.io");
    assert_eq!(r.repository, "org/app");
    assert_eq!(r.digest.as_deref(), Some(DIGEST));
    assert!(r.tag.is_none());
    assert!(r.explicit_registry);
}

#[test]
fn test_digest_wins_in_display() {
    let r = parse_image_reference(&format!("ghcr.io/org/app:1.0@{}", DIGEST)).unwrap();
    assert_eq!(r.tag.as_deref(), Some("1.0"));
    assert_eq!(r.to_string(), format!("ghcr.io/org/app@{}", DIGEST));
}

#[test]
fn test_display_canonical_form() {
    let r = parse_image_reference("redis:7").unwrap();
    assert_eq!(r.to_string(), "docker.io/redis:7");
}

#[test]
fn test_path_separators() {
    for ok in ["a_b", "a__b", "a.b", "a-b", "a---b", "org/sub/app"] {
        assert!(parse_image_reference(ok).is_ok(), "{} should parse", ok);
    }
}

#[test]
fn test_rejections() {
    let bad = [
        "",
        "Nginx:latest",
        "nginx:",
        "my image",
        "nginx:latest ",
        "org//app",
        "/app",
        "app/",
        "a___b",
        "-app",
        "nginx@sha256:short",
        "http://example.com/app",
        "{{ .Values.image }}",
    ];
    for value in bad {
        let err = parse_image_reference(value).unwrap_err();
        assert!(
            matches!(err, RelocError::UnparseableReference { .. }),
            "{:?} should be rejected",
            value
        );
    }
}

#[test]
fn test_invalid_tag_rejected() {
    assert!(parse_image_reference("nginx:-bad").is_err());
    let long_tag = "a".repeat(129);
    assert!(parse_image_reference(&format!("nginx:{}", long_tag)).is_err());
}

#[test]
fn test_from_parts_defaults() {
    let r = Reference::from_parts(Some(""), "nginx", None, None);
    assert_eq!(r.registry, "docker.io");
    assert_eq!(r.tag.as_deref(), Some("latest"));
    assert!(!r.explicit_registry);

    let r = Reference::from_parts(Some("quay.io"), "org/app", None, Some(DIGEST));
    assert!(r.tag.is_none());
    assert!(r.explicit_registry);
}

#[test]
fn test_from_parts_splits_registry_out_of_repository() {
    let r = Reference::from_parts(
        None,
        "quay.io/jetstack/cert-manager-controller",
        Some("v1.14.0"),
        None,
    );
    assert_eq!(r.registry, "quay.io");
    assert_eq!(r.repository, "jetstack/cert-manager-controller");
    assert!(r.explicit_registry);

    let r = Reference::from_parts(None, "localhost:5000/app", None, None);
    assert_eq!(r.registry, "localhost:5000");
    assert_eq!(r.repository, "app");

    // A plain namespace is not a domain.
    let r = Reference::from_parts(None, "bitnami/redis", None, None);
    assert_eq!(r.registry, "docker.io");
    assert_eq!(r.repository, "bitnami/redis");
    assert!(!r.explicit_registry);

    // An explicit registry field leaves the repository untouched.
    let r = Reference::from_parts(Some("ghcr.io"), "quay.io/org/app", None, None);
    assert_eq!(r.registry, "ghcr.io");
    assert_eq!(r.repository, "quay.io/org/app");
}
