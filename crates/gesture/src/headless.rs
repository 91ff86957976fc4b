//! In-memory stand-ins for the map provider and the kiosk chrome.
//!
//! The headless surface models just enough of a slippy map to drive the
//! control core: a center, a zoom, and bounds derived from them with the
//! usual halving-per-level extent. The binary runs on it too, so the
//! whole kiosk works without a renderer attached.

use std::collections::BTreeMap;

use foundation::geo::{GeoBounds, LatLng};
use registry::layer::OverlayStyle;

use crate::surface::{KioskDisplay, MapSurface, TargetStyle};

#[derive(Debug, Clone, PartialEq)]
struct Marker {
    position: LatLng,
    label: Option<String>,
}

/// A provider-free [`MapSurface`].
///
/// `take_zoom_changed` / `take_center_changed` expose the dirty flags the
/// driver loop uses to synthesize viewport-change and tiles-loaded
/// signals one tick after movement.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    zoom: f64,
    center: LatLng,
    markers: BTreeMap<String, Marker>,
    overlays: BTreeMap<String, OverlayStyle>,
    target: Option<(GeoBounds, TargetStyle)>,
    zoom_dirty: bool,
    center_dirty: bool,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0)
    }
}

impl HeadlessSurface {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            zoom,
            center,
            markers: BTreeMap::new(),
            overlays: BTreeMap::new(),
            target: None,
            zoom_dirty: false,
            center_dirty: false,
        }
    }

    pub fn zoom_value(&self) -> f64 {
        self.zoom
    }

    pub fn take_zoom_changed(&mut self) -> bool {
        std::mem::take(&mut self.zoom_dirty)
    }

    pub fn take_center_changed(&mut self) -> bool {
        std::mem::take(&mut self.center_dirty)
    }

    pub fn marker_visible(&self, key: &str) -> bool {
        self.markers.contains_key(key)
    }

    pub fn marker_label(&self, key: &str) -> Option<String> {
        self.markers.get(key).and_then(|m| m.label.clone())
    }

    pub fn overlay_visible(&self, key: &str) -> bool {
        self.overlays.contains_key(key)
    }

    pub fn target_color(&self) -> Option<&'static str> {
        self.target.map(|(_, style)| style.color)
    }

    pub fn target_opacities(&self) -> Option<(f64, f64)> {
        self.target
            .map(|(_, style)| (style.stroke_opacity, style.fill_opacity))
    }
}

impl MapSurface for HeadlessSurface {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        if self.zoom != zoom {
            self.zoom = zoom;
            self.zoom_dirty = true;
        }
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn pan_to(&mut self, point: LatLng) {
        if self.center != point {
            self.center = point;
            self.center_dirty = true;
        }
    }

    fn bounds(&self) -> Option<GeoBounds> {
        if self.zoom < 0.0 {
            return None;
        }
        let width = 360.0 / 2f64.powf(self.zoom);
        let height = 180.0 / 2f64.powf(self.zoom);
        Some(GeoBounds::centered_at(self.center, width * 0.5, height * 0.5))
    }

    fn show_marker(&mut self, key: &str, position: LatLng) {
        self.markers
            .entry(key.to_string())
            .and_modify(|m| m.position = position)
            .or_insert(Marker {
                position,
                label: None,
            });
    }

    fn hide_marker(&mut self, key: &str) {
        self.markers.remove(key);
    }

    fn set_marker_label(&mut self, key: &str, label: Option<&str>) {
        if let Some(marker) = self.markers.get_mut(key) {
            marker.label = label.map(str::to_string);
        }
    }

    fn show_overlay(&mut self, key: &str, style: &OverlayStyle) {
        self.overlays.insert(key.to_string(), style.clone());
    }

    fn hide_overlay(&mut self, key: &str) {
        self.overlays.remove(key);
    }

    fn set_target_indicator(&mut self, bounds: GeoBounds, style: TargetStyle) {
        self.target = Some((bounds, style));
    }
}

/// A [`KioskDisplay`] that records everything for assertions.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub instructions: Option<(String, String)>,
    pub instruction_paints: usize,
    pub card_shows: usize,
    pub card_hides: usize,
    pub log: Vec<String>,
}

impl KioskDisplay for RecordingDisplay {
    fn show_card(&mut self, _key: &str, _sequence: u32) {
        self.card_shows += 1;
    }

    fn hide_card(&mut self, _key: &str, _sequence: u32) {
        self.card_hides += 1;
    }

    fn set_instructions(&mut self, spin: &str, tilt: &str) {
        self.instructions = Some((spin.to_string(), tilt.to_string()));
        self.instruction_paints += 1;
    }

    fn log_message(&mut self, message: &str) {
        self.log.push(message.to_string());
    }
}
