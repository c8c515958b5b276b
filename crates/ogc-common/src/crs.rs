//! Coordinate Reference System code normalization.

/// Normalize the CRS spellings found in capabilities documents to `EPSG:<code>`.
///
/// Accepts formats like:
/// - "EPSG:3067" / "epsg:3067"
/// - "urn:ogc:def:crs:EPSG::3067" / "urn:ogc:def:crs:EPSG:6.18:3:3067"
/// - "http://www.opengis.net/def/crs/EPSG/0/3067"
///
/// Anything that is not an EPSG code ("CRS:84", "urn:ogc:def:crs:OGC:1.3:CRS84")
/// is returned trimmed and otherwise untouched.
pub fn normalize_crs(s: &str) -> String {
    let trimmed = s.trim();
    if !trimmed.to_ascii_uppercase().contains("EPSG") {
        return trimmed.to_string();
    }

    match trimmed
        .rsplit(|c: char| c == ':' || c == '/')
        .find(|part| !part.is_empty())
    {
        Some(code) if code.chars().all(|c| c.is_ascii_digit()) => format!("EPSG:{}", code),
        _ => trimmed.to_string(),
    }
}
