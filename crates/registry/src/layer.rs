use std::collections::BTreeMap;

/// What a feature key means inside a layer's visibility map.
///
/// The three variants replace the legacy true/false/string encoding:
/// - `CardHotspot`: open the feature's interest card and pan to it.
/// - `RegionOverlay`: show the feature's shape overlay, styled per feature.
/// - `MarkerReference`: highlight a *different* feature's marker, optionally
///   labeled with this key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    CardHotspot,
    RegionOverlay,
    MarkerReference(String),
}

/// Stroke/fill styling for a region overlay.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayStyle {
    pub fill_color: String,
    pub stroke_weight: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill_color: "magenta".to_string(),
            stroke_weight: 1.0,
        }
    }
}

/// One step of the zoom/navigation sequence, immutable after load.
///
/// Control data (pannable flag, target zoom, instruction texts, card
/// sequence index, label flag) lives in explicit fields; the visibility map
/// holds feature keys only, so diffing never has to skip control keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDefinition {
    pub pannable: bool,
    /// Target zoom magnitude applied on entering the layer.
    pub viewport_zoom: f64,
    pub spin_instruction: String,
    pub tilt_instruction: String,
    /// Which numbered card image a `CardHotspot` (or proximity match) opens.
    pub image_sequence_index: Option<u32>,
    pub show_labels: bool,
    pub visibility: BTreeMap<String, Visibility>,
}

impl LayerDefinition {
    /// The skip rule used by transition diffing: a key produces no
    /// load/unload work iff its value is unchanged between the two layers
    /// AND the show-labels flag is unchanged.
    pub fn key_unchanged(&self, other: &LayerDefinition, key: &str) -> bool {
        self.show_labels == other.show_labels
            && self.visibility.get(key) == other.visibility.get(key)
    }
}
