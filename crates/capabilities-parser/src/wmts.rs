//! WMTS 1.0.0 capabilities model.

use ogc_common::{BoundingBox, ResourceUrl, StyleInfo};
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::wms::parse_f64;
use crate::xml::{parse_document, XmlElement};

const ROOT_WMTS: &str = "Capabilities";

/// Parsed WMTS capabilities.
#[derive(Debug, Clone)]
pub struct WmtsCapabilities {
    pub version: Option<String>,
    pub layers: Vec<WmtsLayer>,
    pub tile_matrix_sets: Vec<TileMatrixSet>,
}

impl WmtsCapabilities {
    pub fn find_layer(&self, identifier: &str) -> Option<&WmtsLayer> {
        self.layers.iter().find(|l| l.identifier == identifier)
    }

    pub fn tile_matrix_set(&self, identifier: &str) -> Option<&TileMatrixSet> {
        self.tile_matrix_sets
            .iter()
            .find(|s| s.identifier == identifier)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WmtsLayer {
    pub identifier: String,
    pub title: Option<String>,
    pub styles: Vec<StyleInfo>,
    pub formats: Vec<String>,
    pub info_formats: Vec<String>,
    /// Identifiers of the linked tile matrix sets, in document order
    pub tile_matrix_set_links: Vec<String>,
    pub resource_urls: Vec<ResourceUrl>,
    /// WGS84 bounding box
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone)]
pub struct TileMatrixSet {
    pub identifier: String,
    pub supported_crs: String,
    pub matrices: Vec<TileMatrix>,
}

impl TileMatrixSet {
    /// Smallest and largest scale denominator over all matrices.
    pub fn scale_range(&self) -> Option<(f64, f64)> {
        self.matrices.iter().fold(None, |acc, m| {
            let s = m.scale_denominator;
            Some(match acc {
                Some((min, max)) => (f64::min(min, s), f64::max(max, s)),
                None => (s, s),
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct TileMatrix {
    pub identifier: String,
    pub scale_denominator: f64,
    /// (x, y) in the set's CRS
    pub top_left: (f64, f64),
    pub tile_width: u32,
    pub tile_height: u32,
    pub matrix_width: u32,
    pub matrix_height: u32,
}

/// Parse a WMTS GetCapabilities document.
pub fn parse_wmts(xml: &str) -> ParseResult<WmtsCapabilities> {
    let root = parse_document(xml)?;
    if root.name != ROOT_WMTS {
        return Err(ParseError::UnexpectedRoot {
            expected: ROOT_WMTS,
            actual: root.name,
        });
    }

    let contents = root
        .child("Contents")
        .ok_or(ParseError::MissingElement("Contents"))?;

    let layers = contents
        .children_named("Layer")
        .map(parse_layer)
        .collect::<ParseResult<Vec<_>>>()?;
    let tile_matrix_sets = contents
        .children_named("TileMatrixSet")
        .map(parse_tile_matrix_set)
        .collect::<ParseResult<Vec<_>>>()?;

    debug!(
        layers = layers.len(),
        tile_matrix_sets = tile_matrix_sets.len(),
        "Parsed WMTS capabilities"
    );

    Ok(WmtsCapabilities {
        version: root.attr("version").map(str::to_string),
        layers,
        tile_matrix_sets,
    })
}

fn parse_layer(el: &XmlElement) -> ParseResult<WmtsLayer> {
    let identifier = el
        .child_text("Identifier")
        .ok_or(ParseError::MissingElement("Layer/Identifier"))?
        .to_string();

    let styles = el
        .children_named("Style")
        .map(|s| StyleInfo {
            name: s.child_text("Identifier").unwrap_or_default().to_string(),
            title: s.child_text("Title").map(str::to_string),
            legend_url: s
                .child("LegendURL")
                .and_then(|l| l.attr("href"))
                .map(str::to_string),
        })
        .collect();

    let tile_matrix_set_links = el
        .children_named("TileMatrixSetLink")
        .filter_map(|link| link.child_text("TileMatrixSet"))
        .map(str::to_string)
        .collect();

    let resource_urls = el
        .children_named("ResourceURL")
        .filter_map(|r| {
            Some(ResourceUrl {
                format: r.attr("format")?.to_string(),
                resource_type: r.attr("resourceType")?.to_string(),
                template: r.attr("template")?.to_string(),
            })
        })
        .collect();

    let bbox = match el.child("WGS84BoundingBox") {
        Some(b) => {
            let lower = b
                .child_text("LowerCorner")
                .ok_or(ParseError::MissingElement("LowerCorner"))?;
            let upper = b
                .child_text("UpperCorner")
                .ok_or(ParseError::MissingElement("UpperCorner"))?;
            let bbox = BoundingBox::from_corners(lower, upper).map_err(|e| {
                ParseError::InvalidDocument(format!("layer {}: {}", identifier, e))
            })?;
            Some(bbox)
        }
        None => None,
    };

    Ok(WmtsLayer {
        title: el.child_text("Title").map(str::to_string),
        styles,
        formats: el.child_texts("Format"),
        info_formats: el.child_texts("InfoFormat"),
        tile_matrix_set_links,
        resource_urls,
        bbox,
        identifier,
    })
}

fn parse_tile_matrix_set(el: &XmlElement) -> ParseResult<TileMatrixSet> {
    let identifier = el
        .child_text("Identifier")
        .ok_or(ParseError::MissingElement("TileMatrixSet/Identifier"))?
        .to_string();
    let supported_crs = el
        .child_text("SupportedCRS")
        .ok_or_else(|| {
            ParseError::InvalidDocument(format!("tile matrix set {} has no SupportedCRS", identifier))
        })?
        .to_string();
    let matrices = el
        .children_named("TileMatrix")
        .map(parse_tile_matrix)
        .collect::<ParseResult<Vec<_>>>()?;
    if matrices.is_empty() {
        return Err(ParseError::InvalidDocument(format!(
            "tile matrix set {} has no tile matrices",
            identifier
        )));
    }

    Ok(TileMatrixSet {
        identifier,
        supported_crs,
        matrices,
    })
}

fn parse_tile_matrix(el: &XmlElement) -> ParseResult<TileMatrix> {
    let required = |name: &'static str| -> ParseResult<&str> {
        el.child_text(name).ok_or(ParseError::MissingElement(name))
    };
    let integer = |name: &'static str| -> ParseResult<u32> {
        let value = required(name)?;
        value.parse().map_err(|_| ParseError::InvalidNumber {
            element: name,
            value: value.to_string(),
        })
    };

    let corner = required("TopLeftCorner")?;
    let mut coords = corner.split_whitespace();
    let top_left = match (coords.next(), coords.next()) {
        (Some(x), Some(y)) => (parse_f64("TopLeftCorner", x)?, parse_f64("TopLeftCorner", y)?),
        _ => {
            return Err(ParseError::InvalidNumber {
                element: "TopLeftCorner",
                value: corner.to_string(),
            })
        }
    };

    Ok(TileMatrix {
        identifier: required("Identifier")?.to_string(),
        scale_denominator: parse_f64("ScaleDenominator", required("ScaleDenominator")?)?,
        top_left,
        tile_width: integer("TileWidth")?,
        tile_height: integer("TileHeight")?,
        matrix_width: integer("MatrixWidth")?,
        matrix_height: integer("MatrixHeight")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wms_root() {
        let err = parse_wmts("<WMS_Capabilities/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_requires_contents() {
        let err = parse_wmts(r#"<Capabilities version="1.0.0"/>"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement("Contents")));
    }

    #[test]
    fn test_matrix_set_without_matrices_is_invalid() {
        let xml = r#"<Capabilities><Contents><TileMatrixSet>
            <Identifier>empty</Identifier><SupportedCRS>EPSG:3067</SupportedCRS>
            </TileMatrixSet></Contents></Capabilities>"#;
        let err = parse_wmts(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDocument(_)));
    }

    #[test]
    fn test_scale_range() {
        let matrix = |scale| TileMatrix {
            identifier: "m".to_string(),
            scale_denominator: scale,
            top_left: (0.0, 0.0),
            tile_width: 256,
            tile_height: 256,
            matrix_width: 1,
            matrix_height: 1,
        };
        let set = TileMatrixSet {
            identifier: "s".to_string(),
            supported_crs: "EPSG:3067".to_string(),
            matrices: vec![matrix(500.0), matrix(8000.0), matrix(2000.0)],
        };
        assert_eq!(set.scale_range(), Some((500.0, 8000.0)));
    }
}
