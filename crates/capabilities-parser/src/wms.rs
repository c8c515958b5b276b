//! WMS 1.1.1 / 1.3.0 capabilities model.
//!
//! Layer properties are resolved against their ancestors while parsing, so a
//! [`WmsLayer`] already carries what the WMS specification says it inherits:
//! - styles and CRS are added to the parent's
//! - bounding box and scale denominators replace the parent's when present
//! - `queryable` falls back to the parent's value
//!
//! Only document-level problems fail [`parse_wms`]. A layer with unreadable
//! scale or bounding box values is kept, carries the error, and reports it
//! from [`WmsLayer::check`].

use std::collections::BTreeSet;

use ogc_common::{BoundingBox, StyleInfo};
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::xml::{parse_document, XmlElement};

const ROOT_WMS_130: &str = "WMS_Capabilities";
const ROOT_WMS_LEGACY: &str = "WMT_MS_Capabilities";

/// Standardized rendering pixel size in meters (0.28 mm).
const STANDARD_PIXEL_SIZE: f64 = 0.00028;

/// Parsed WMS capabilities.
#[derive(Debug, Clone)]
pub struct WmsCapabilities {
    pub version: Option<String>,
    /// GetMap output formats
    pub formats: Vec<String>,
    /// GetFeatureInfo output formats
    pub info_formats: Vec<String>,
    /// Top-level layers
    pub layers: Vec<WmsLayer>,
}

impl WmsCapabilities {
    /// Find a named layer anywhere in the tree (depth-first).
    pub fn find_layer(&self, name: &str) -> Option<&WmsLayer> {
        self.layers.iter().find_map(|l| l.find(name))
    }

    /// Every layer in the tree, parents before children.
    pub fn all_layers(&self) -> Vec<&WmsLayer> {
        let mut out = Vec::new();
        for layer in &self.layers {
            layer.collect(&mut out);
        }
        out
    }
}

/// A WMS layer with inherited properties already applied.
#[derive(Debug, Clone, Default)]
pub struct WmsLayer {
    /// Absent for pure grouping layers
    pub name: Option<String>,
    pub title: Option<String>,
    pub queryable: bool,
    pub crs: BTreeSet<String>,
    pub styles: Vec<StyleInfo>,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
    pub bbox: Option<BoundingBox>,
    pub layers: Vec<WmsLayer>,
    /// Set when scale values were unreadable, here or on the ancestor they are inherited from
    scale_error: Option<ParseError>,
    /// Set when the bounding box was unreadable, here or on the ancestor it is inherited from
    bbox_error: Option<ParseError>,
}

impl WmsLayer {
    /// Fail with the first per-layer value error, if any.
    pub fn check(&self) -> ParseResult<()> {
        match self.scale_error.as_ref().or(self.bbox_error.as_ref()) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn find(&self, name: &str) -> Option<&WmsLayer> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.layers.iter().find_map(|l| l.find(name))
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a WmsLayer>) {
        out.push(self);
        for child in &self.layers {
            child.collect(out);
        }
    }
}

/// Parse a WMS GetCapabilities document.
pub fn parse_wms(xml: &str) -> ParseResult<WmsCapabilities> {
    let root = parse_document(xml)?;
    if root.name != ROOT_WMS_130 && root.name != ROOT_WMS_LEGACY {
        return Err(ParseError::UnexpectedRoot {
            expected: "WMS_Capabilities or WMT_MS_Capabilities",
            actual: root.name,
        });
    }

    let capability = root
        .child("Capability")
        .ok_or(ParseError::MissingElement("Capability"))?;

    let formats = capability
        .path(&["Request", "GetMap"])
        .map(|el| el.child_texts("Format"))
        .unwrap_or_default();
    let info_formats = capability
        .path(&["Request", "GetFeatureInfo"])
        .map(|el| el.child_texts("Format"))
        .unwrap_or_default();

    let layers: Vec<WmsLayer> = capability
        .children_named("Layer")
        .map(|el| parse_layer(el, None))
        .collect();

    let caps = WmsCapabilities {
        version: root.attr("version").map(str::to_string),
        formats,
        info_formats,
        layers,
    };
    debug!(
        version = ?caps.version,
        layers = caps.all_layers().len(),
        "Parsed WMS capabilities"
    );
    Ok(caps)
}

fn parse_layer(el: &XmlElement, parent: Option<&WmsLayer>) -> WmsLayer {
    let queryable = match el.attr("queryable") {
        Some(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        None => parent.map(|p| p.queryable).unwrap_or(false),
    };

    let mut crs = parent.map(|p| p.crs.clone()).unwrap_or_default();
    for tag in ["CRS", "SRS"] {
        for value in el.child_texts(tag) {
            crs.extend(value.split_whitespace().map(str::to_string));
        }
    }

    let mut styles = parent.map(|p| p.styles.clone()).unwrap_or_default();
    for style_el in el.children_named("Style") {
        let style = parse_style(style_el);
        styles.retain(|s| s.name != style.name);
        styles.push(style);
    }

    let name = el.child_text("Name").map(str::to_string);

    let (min_scale, max_scale, scale_error) = match parse_scales(el) {
        Ok((None, None)) => parent
            .map(|p| (p.min_scale, p.max_scale, p.scale_error.clone()))
            .unwrap_or_default(),
        Ok((min, max)) => (min, max, None),
        Err(e) => {
            debug!(layer = ?name, error = %e, "Unreadable scale denominators");
            (None, None, Some(e))
        }
    };

    let (bbox, bbox_error) = match parse_geographic_bbox(el) {
        Ok(Some(bbox)) => (Some(bbox), None),
        Ok(None) => parent
            .map(|p| (p.bbox, p.bbox_error.clone()))
            .unwrap_or_default(),
        Err(e) => {
            debug!(layer = ?name, error = %e, "Unreadable geographic bounding box");
            (None, Some(e))
        }
    };

    let mut layer = WmsLayer {
        name,
        title: el.child_text("Title").map(str::to_string),
        queryable,
        crs,
        styles,
        min_scale,
        max_scale,
        bbox,
        layers: Vec::new(),
        scale_error,
        bbox_error,
    };

    let children: Vec<WmsLayer> = el
        .children_named("Layer")
        .map(|child| parse_layer(child, Some(&layer)))
        .collect();
    layer.layers = children;
    layer
}

fn parse_style(el: &XmlElement) -> StyleInfo {
    StyleInfo {
        name: el.child_text("Name").unwrap_or_default().to_string(),
        title: el.child_text("Title").map(str::to_string),
        legend_url: el
            .path(&["LegendURL", "OnlineResource"])
            .and_then(|r| r.attr("href"))
            .map(str::to_string),
    }
}

/// Scale denominators from 1.3.0 elements, or converted from a 1.1.1 ScaleHint.
fn parse_scales(el: &XmlElement) -> ParseResult<(Option<f64>, Option<f64>)> {
    let min = el
        .child_text("MinScaleDenominator")
        .map(|v| parse_f64("MinScaleDenominator", v))
        .transpose()?;
    let max = el
        .child_text("MaxScaleDenominator")
        .map(|v| parse_f64("MaxScaleDenominator", v))
        .transpose()?;
    if min.is_some() || max.is_some() {
        return Ok((min, max));
    }

    let Some(hint) = el.child("ScaleHint") else {
        return Ok((None, None));
    };
    // ScaleHint is the ground distance of a pixel diagonal in meters.
    let to_denominator = |v: f64| v / std::f64::consts::SQRT_2 / STANDARD_PIXEL_SIZE;
    let min = hint
        .attr("min")
        .map(|v| parse_f64("ScaleHint", v))
        .transpose()?
        .map(to_denominator);
    let max = hint
        .attr("max")
        .map(|v| parse_f64("ScaleHint", v))
        .transpose()?
        .map(to_denominator);
    Ok((min, max))
}

fn parse_geographic_bbox(el: &XmlElement) -> ParseResult<Option<BoundingBox>> {
    if let Some(ex) = el.child("EX_GeographicBoundingBox") {
        let value = |name: &'static str| -> ParseResult<f64> {
            let text = ex
                .child_text(name)
                .ok_or(ParseError::MissingElement(name))?;
            parse_f64(name, text)
        };
        return Ok(Some(BoundingBox::new(
            value("westBoundLongitude")?,
            value("southBoundLatitude")?,
            value("eastBoundLongitude")?,
            value("northBoundLatitude")?,
        )));
    }

    if let Some(ll) = el.child("LatLonBoundingBox") {
        let value = |name: &'static str| -> ParseResult<f64> {
            let text = ll
                .attr(name)
                .ok_or(ParseError::MissingElement("LatLonBoundingBox"))?;
            parse_f64("LatLonBoundingBox", text)
        };
        return Ok(Some(BoundingBox::new(
            value("minx")?,
            value("miny")?,
            value("maxx")?,
            value("maxy")?,
        )));
    }

    Ok(None)
}

pub(crate) fn parse_f64(element: &'static str, value: &str) -> ParseResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber {
            element,
            value: value.to_string(),
        })
}
