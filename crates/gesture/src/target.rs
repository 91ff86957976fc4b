//! Hotspot proximity detection and the viewport-center target indicator.

use foundation::geo::GeoBounds;
use registry::layer::{LayerDefinition, Visibility};
use registry::registry::LayerRegistry;

use crate::surface::{MapSurface, TargetStyle, TARGET_COLD, TARGET_HOT};

/// The detection box: a rectangle of `fraction` of the viewport extent,
/// centered on the viewport center.
pub fn detection_box(bounds: &GeoBounds, fraction: f64) -> GeoBounds {
    GeoBounds::centered_at(
        bounds.center(),
        bounds.width() * fraction * 0.5,
        bounds.height() * fraction * 0.5,
    )
}

/// Marker-reference targets of `layer` whose position lies inside the
/// detection box, in ascending feature-key order. Each entry is
/// `(feature key, target key)`.
pub fn targets_in_box<'a>(
    registry: &LayerRegistry,
    layer: &'a LayerDefinition,
    bounds: &GeoBounds,
    fraction: f64,
) -> Vec<(&'a str, &'a str)> {
    let hot_box = detection_box(bounds, fraction);
    layer
        .visibility
        .iter()
        .filter_map(|(key, value)| match value {
            Visibility::MarkerReference(target) => {
                let position = registry.hotspot(target)?;
                hot_box.contains(position).then_some((key.as_str(), target.as_str()))
            }
            _ => None,
        })
        .collect()
}

/// Repaint the highlight rectangle at the viewport center.
///
/// Invisible on non-pannable layers. On pannable layers the stroke is
/// drawn at 0.8 opacity, the fill only past zoom level 10, and the color
/// flips to the hot variant while a marker-reference hotspot sits inside
/// the detection box.
pub fn paint_target(
    registry: &LayerRegistry,
    layer: &LayerDefinition,
    surface: &mut impl MapSurface,
    fraction: f64,
) {
    if surface.zoom() < 1.0 {
        return;
    }
    let Some(bounds) = surface.bounds() else {
        return;
    };
    let hot_box = detection_box(&bounds, fraction);

    let style = if !layer.pannable {
        TargetStyle::hidden()
    } else {
        let hot = !targets_in_box(registry, layer, &bounds, fraction).is_empty();
        TargetStyle {
            color: if hot { TARGET_HOT } else { TARGET_COLD },
            stroke_opacity: 0.8,
            fill_opacity: if layer.viewport_zoom > 10.0 { 0.35 } else { 0.0 },
        }
    };
    surface.set_target_indicator(hot_box, style);
}
