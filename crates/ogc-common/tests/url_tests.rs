//! Tests for service URL simplification and grouping identity.

use ogc_common::{simplify_url, LayerRef, ServiceType, UrlTypeVersionKey};

// ============================================================================
// simplify_url tests
// ============================================================================

#[test]
fn test_simplify_lowercases_host_and_scheme() {
    assert_eq!(
        simplify_url("HTTPS://Maps.Example.COM/geoserver/wms"),
        "https://maps.example.com/geoserver/wms"
    );
}

#[test]
fn test_simplify_drops_default_port() {
    assert_eq!(
        simplify_url("https://maps.example.com:443/wms"),
        "https://maps.example.com/wms"
    );
    assert_eq!(
        simplify_url("http://maps.example.com:8080/wms"),
        "http://maps.example.com:8080/wms"
    );
}

#[test]
fn test_simplify_removes_bare_question_mark() {
    assert_eq!(
        simplify_url("http://maps.example.com/wms?"),
        "http://maps.example.com/wms"
    );
}

#[test]
fn test_simplify_removes_empty_query_segments() {
    assert_eq!(
        simplify_url("http://maps.example.com/wms?&map=a&&=x&"),
        "http://maps.example.com/wms?map=a"
    );
}

#[test]
fn test_simplify_keeps_version_parameter() {
    let simplified = simplify_url("http://maps.example.com/wfs?VERSION=2.0.0");
    assert_eq!(simplified, "http://maps.example.com/wfs?VERSION=2.0.0");
}

#[test]
fn test_simplify_removes_fragment() {
    assert_eq!(
        simplify_url("http://maps.example.com/wms#layers"),
        "http://maps.example.com/wms"
    );
}

#[test]
fn test_simplify_relative_value_is_trimmed() {
    assert_eq!(simplify_url("  /geoserver/wms?  "), "/geoserver/wms");
}

#[test]
fn test_simplify_is_idempotent() {
    let once = simplify_url("https://u:p@maps.example.com/wms?&a=1#x");
    assert_eq!(simplify_url(&once), once);
}

// ============================================================================
// Layer identity tests
// ============================================================================

#[test]
fn test_layers_with_different_credentials_share_key() {
    let a = LayerRef::new(1, "a", "https://alice:1@maps.example.com/wms", ServiceType::Wms, Some("1.3.0"));
    let b = LayerRef::new(2, "b", "https://bob:2@maps.example.com/wms", ServiceType::Wms, Some("1.3.0"));
    assert_eq!(UrlTypeVersionKey::for_layer(&a), UrlTypeVersionKey::for_layer(&b));
    assert_eq!(a.simplified_url(), "https://maps.example.com/wms");
}

#[test]
fn test_layers_with_different_types_do_not_share_key() {
    let a = LayerRef::new(1, "a", "https://maps.example.com/service", ServiceType::Wms, None);
    let b = LayerRef::new(2, "b", "https://maps.example.com/service", ServiceType::Wmts, None);
    assert_ne!(UrlTypeVersionKey::for_layer(&a), UrlTypeVersionKey::for_layer(&b));
}
