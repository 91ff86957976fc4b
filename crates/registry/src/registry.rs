use std::collections::BTreeMap;

use foundation::geo::LatLng;

use crate::config::RegistryError;
use crate::layer::{LayerDefinition, OverlayStyle};

/// The ordered layer table plus the feature-key lookup tables.
///
/// Loaded once at startup and read-only afterwards; all navigation state
/// lives elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRegistry {
    layers: Vec<LayerDefinition>,
    hotspots: BTreeMap<String, LatLng>,
    overlay_styles: BTreeMap<String, OverlayStyle>,
}

impl LayerRegistry {
    pub fn from_parts(
        layers: Vec<LayerDefinition>,
        hotspots: BTreeMap<String, LatLng>,
        overlay_styles: BTreeMap<String, OverlayStyle>,
    ) -> Result<Self, RegistryError> {
        if layers.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self {
            layers,
            hotspots,
            overlay_styles,
        })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, index: usize) -> Option<&LayerDefinition> {
        self.layers.get(index)
    }

    /// Clamp an arbitrary proposal into `[0, len-1]`.
    pub fn clamp_index(&self, proposed: i64) -> usize {
        proposed.clamp(0, self.layers.len() as i64 - 1) as usize
    }

    /// Geographic position for a hotspot key; absent keys are the caller's
    /// silent no-op case.
    pub fn hotspot(&self, key: &str) -> Option<LatLng> {
        self.hotspots.get(key).copied()
    }

    /// Overlay style for a feature key, falling back to the default style.
    pub fn overlay_style(&self, key: &str) -> OverlayStyle {
        self.overlay_styles.get(key).cloned().unwrap_or_default()
    }
}
