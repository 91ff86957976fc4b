//! Interface boundaries towards the map provider and the kiosk chrome.
//!
//! Everything the control core does to the outside world goes through
//! these two traits, so the whole pipeline runs headless in tests and in
//! the binary alike.

use foundation::geo::{GeoBounds, LatLng};
use registry::layer::OverlayStyle;

/// Target-indicator color before a hotspot enters the detection box.
pub const TARGET_COLD: &str = "#ffaaaa";
/// Target-indicator color once a hotspot lies inside the detection box.
pub const TARGET_HOT: &str = "#aaffaa";

/// Styling of the viewport-center highlight rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStyle {
    pub color: &'static str,
    pub stroke_opacity: f64,
    pub fill_opacity: f64,
}

impl TargetStyle {
    pub const fn hidden() -> Self {
        Self {
            color: TARGET_COLD,
            stroke_opacity: 0.0,
            fill_opacity: 0.0,
        }
    }
}

/// The map provider, reduced to the primitives the kiosk drives.
pub trait MapSurface {
    fn zoom(&self) -> f64;
    fn set_zoom(&mut self, zoom: f64);
    fn center(&self) -> LatLng;
    fn pan_to(&mut self, point: LatLng);
    /// Current viewport bounds; None until the provider has laid out.
    fn bounds(&self) -> Option<GeoBounds>;
    fn show_marker(&mut self, key: &str, position: LatLng);
    fn hide_marker(&mut self, key: &str);
    fn set_marker_label(&mut self, key: &str, label: Option<&str>);
    fn show_overlay(&mut self, key: &str, style: &OverlayStyle);
    fn hide_overlay(&mut self, key: &str);
    fn set_target_indicator(&mut self, bounds: GeoBounds, style: TargetStyle);
}

/// The non-map kiosk chrome: interest cards, instruction texts, the
/// visible message log.
pub trait KioskDisplay {
    fn show_card(&mut self, key: &str, sequence: u32);
    fn hide_card(&mut self, key: &str, sequence: u32);
    fn set_instructions(&mut self, spin: &str, tilt: &str);
    fn log_message(&mut self, message: &str);
}
