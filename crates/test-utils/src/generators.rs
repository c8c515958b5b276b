//! Builders for layers and encoded response bodies.

use ogc_common::{Credentials, LayerRef, ServiceType};

/// WMS layer with the given id, name, url and version.
pub fn wms_layer(id: i64, name: &str, url: &str, version: Option<&str>) -> LayerRef {
    LayerRef::new(id, name, url, ServiceType::Wms, version)
}

/// WMTS layer with the given id, name, url and version.
pub fn wmts_layer(id: i64, name: &str, url: &str, version: Option<&str>) -> LayerRef {
    LayerRef::new(id, name, url, ServiceType::Wmts, version)
}

/// WFS layer with the given id, name, url and version.
pub fn wfs_layer(id: i64, name: &str, url: &str, version: Option<&str>) -> LayerRef {
    LayerRef::new(id, name, url, ServiceType::Wfs, version)
}

/// Same layer with basic auth credentials attached.
pub fn with_login(layer: LayerRef, user: &str, password: &str) -> LayerRef {
    layer.with_credentials(Credentials::new(user, password))
}

/// Encode text as ISO-8859-1.
///
/// # Panics
///
/// Panics on characters outside Latin-1; fixtures are expected to stay inside it.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("character outside ISO-8859-1"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_latin1() {
        assert_eq!(encode_latin1("aä"), vec![b'a', 0xE4]);
    }

    #[test]
    fn test_with_login() {
        let layer = with_login(wms_layer(1, "a", "http://x/wms", None), "u", "p");
        assert_eq!(layer.credentials.unwrap().username, "u");
    }
}
