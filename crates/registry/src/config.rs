//! JSON configuration loading for the layer registry.
//!
//! The on-disk document keeps the field names of the original kiosk tables
//! (`mapZoom`, `spinInstruction`, ...) but encodes visibility explicitly:
//! `"card"`, `"region"`, or `{"marker": "<target key>"}` instead of the
//! legacy true/false/string values.

use std::collections::BTreeMap;
use std::path::Path;

use foundation::geo::LatLng;
use serde::Deserialize;
use thiserror::Error;

use crate::layer::{LayerDefinition, OverlayStyle, Visibility};
use crate::registry::LayerRegistry;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse registry config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("registry must define at least one layer")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RegistryDoc {
    layers: Vec<LayerSpec>,
    #[serde(default)]
    hotspots: BTreeMap<String, LatLngSpec>,
    #[serde(default, rename = "overlayStyles")]
    overlay_styles: BTreeMap<String, OverlayStyleSpec>,
}

#[derive(Debug, Deserialize)]
struct LayerSpec {
    #[serde(default = "default_true")]
    pannable: bool,
    #[serde(rename = "mapZoom")]
    viewport_zoom: f64,
    #[serde(rename = "spinInstruction")]
    spin_instruction: String,
    #[serde(rename = "tiltInstruction")]
    tilt_instruction: String,
    #[serde(default, rename = "imageSequenceIndex")]
    image_sequence_index: Option<u32>,
    #[serde(default, rename = "showLabels")]
    show_labels: bool,
    #[serde(default)]
    visibility: BTreeMap<String, VisibilitySpec>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct LatLngSpec {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverlayStyleSpec {
    fill_color: String,
    #[serde(default = "default_stroke_weight")]
    stroke_weight: f64,
}

fn default_stroke_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VisibilitySpec {
    Kind(VisibilityKind),
    Marker { marker: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum VisibilityKind {
    Card,
    Region,
}

impl From<VisibilitySpec> for Visibility {
    fn from(spec: VisibilitySpec) -> Self {
        match spec {
            VisibilitySpec::Kind(VisibilityKind::Card) => Visibility::CardHotspot,
            VisibilitySpec::Kind(VisibilityKind::Region) => Visibility::RegionOverlay,
            VisibilitySpec::Marker { marker } => Visibility::MarkerReference(marker),
        }
    }
}

impl From<LayerSpec> for LayerDefinition {
    fn from(spec: LayerSpec) -> Self {
        LayerDefinition {
            pannable: spec.pannable,
            viewport_zoom: spec.viewport_zoom,
            spin_instruction: spec.spin_instruction,
            tilt_instruction: spec.tilt_instruction,
            image_sequence_index: spec.image_sequence_index,
            show_labels: spec.show_labels,
            visibility: spec
                .visibility
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
        }
    }
}

pub fn load_registry_json(json: &str) -> Result<LayerRegistry, RegistryError> {
    let doc: RegistryDoc = serde_json::from_str(json)?;
    let layers = doc.layers.into_iter().map(Into::into).collect();
    let hotspots = doc
        .hotspots
        .into_iter()
        .map(|(k, p)| (k, LatLng::new(p.lat, p.lng)))
        .collect();
    let overlay_styles = doc
        .overlay_styles
        .into_iter()
        .map(|(k, s)| {
            (
                k,
                OverlayStyle {
                    fill_color: s.fill_color,
                    stroke_weight: s.stroke_weight,
                },
            )
        })
        .collect();
    LayerRegistry::from_parts(layers, hotspots, overlay_styles)
}

pub fn load_registry_file(path: &Path) -> Result<LayerRegistry, RegistryError> {
    let json = std::fs::read_to_string(path)?;
    load_registry_json(&json)
}
