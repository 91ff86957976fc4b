//! Layer-to-layer transition: visibility diffing and side effects.

use registry::layer::Visibility;
use registry::registry::LayerRegistry;
use tracing::debug;

use crate::cards::OpenCardSet;
use crate::surface::{KioskDisplay, MapSurface};

/// Applies the difference between two layers to the surface and display.
///
/// A transition runs in two phases over the visibility maps: unload what
/// the outgoing layer showed (skipped entirely when there is no outgoing
/// layer), then load what the incoming layer shows. A key whose value is
/// unchanged between the two layers, with the show-labels flag also
/// unchanged, produces no work in either phase. Instruction texts are
/// repainted on every real transition; a transition to the current index
/// does nothing at all.
#[derive(Debug, Clone, Copy)]
pub struct TransitionEngine {
    min_zoom: f64,
    max_zoom: f64,
}

impl TransitionEngine {
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self { min_zoom, max_zoom }
    }

    pub fn transition(
        &self,
        registry: &LayerRegistry,
        from: Option<usize>,
        to: usize,
        cards: &mut OpenCardSet,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) {
        if from == Some(to) {
            return;
        }
        let Some(to_layer) = registry.layer(to) else {
            return;
        };

        if let Some(from_layer) = from.and_then(|i| registry.layer(i)) {
            for (key, value) in &from_layer.visibility {
                if from_layer.key_unchanged(to_layer, key) {
                    continue;
                }
                match value {
                    Visibility::CardHotspot => cards.close_key(key, display),
                    Visibility::MarkerReference(target) => {
                        surface.set_marker_label(target, None);
                        surface.hide_marker(target);
                    }
                    Visibility::RegionOverlay => surface.hide_overlay(key),
                }
            }
        }

        display.set_instructions(&to_layer.spin_instruction, &to_layer.tilt_instruction);

        for (key, value) in &to_layer.visibility {
            let unchanged = from
                .and_then(|i| registry.layer(i))
                .map_or(false, |from_layer| from_layer.key_unchanged(to_layer, key));
            if unchanged {
                continue;
            }
            match value {
                Visibility::CardHotspot => {
                    if let Some(position) = registry.hotspot(key) {
                        surface.pan_to(position);
                    } else {
                        debug!(%key, "card hotspot has no configured position");
                    }
                    if let Some(sequence) = to_layer.image_sequence_index {
                        cards.open(key, sequence, display);
                    }
                }
                Visibility::MarkerReference(target) => {
                    if let Some(position) = registry.hotspot(target) {
                        surface.show_marker(target, position);
                        let label = to_layer.show_labels.then_some(key.as_str());
                        surface.set_marker_label(target, label);
                    } else {
                        debug!(%key, %target, "marker reference has no configured position");
                    }
                }
                Visibility::RegionOverlay => {
                    surface.show_overlay(key, &registry.overlay_style(key));
                }
            }
        }

        surface.set_zoom(to_layer.viewport_zoom.clamp(self.min_zoom, self.max_zoom));
    }
}

#[cfg(test)]
mod tests {
    use registry::demo::demo_registry;

    use super::TransitionEngine;
    use crate::cards::OpenCardSet;
    use crate::headless::{HeadlessSurface, RecordingDisplay};
    use crate::surface::MapSurface;

    fn engine() -> TransitionEngine {
        TransitionEngine::new(3.0, 19.0)
    }

    #[test]
    fn same_index_transition_has_zero_side_effects() {
        let registry = demo_registry();
        let mut cards = OpenCardSet::new();
        let mut surface = HeadlessSurface::default();
        let mut display = RecordingDisplay::default();

        engine().transition(&registry, None, 2, &mut cards, &mut surface, &mut display);
        let paints_before = display.instruction_paints;
        let zoom_before = surface.zoom_value();

        engine().transition(&registry, Some(2), 2, &mut cards, &mut surface, &mut display);
        assert_eq!(display.instruction_paints, paints_before);
        assert_eq!(surface.zoom_value(), zoom_before);
    }

    #[test]
    fn first_transition_skips_the_unload_phase() {
        let registry = demo_registry();
        let mut cards = OpenCardSet::new();
        let mut surface = HeadlessSurface::default();
        let mut display = RecordingDisplay::default();

        engine().transition(&registry, None, 0, &mut cards, &mut surface, &mut display);
        assert!(surface.overlay_visible("Mexico"));
        assert_eq!(display.instruction_paints, 1);
    }

    #[test]
    fn unchanged_key_is_not_repainted() {
        let registry = demo_registry();
        let mut cards = OpenCardSet::new();
        let mut surface = HeadlessSurface::default();
        let mut display = RecordingDisplay::default();

        // Layers 2 and 3 both map Sinaloa -> marker site5, but flip the
        // show-labels flag; layers 4 and 5 share site5 -> card unchanged.
        engine().transition(&registry, None, 4, &mut cards, &mut surface, &mut display);
        let shows_before = display.card_shows;
        engine().transition(&registry, Some(4), 5, &mut cards, &mut surface, &mut display);
        assert_eq!(
            display.card_shows, shows_before,
            "unchanged card key must not reopen"
        );
    }

    #[test]
    fn label_flag_change_repaints_the_shared_marker() {
        let registry = demo_registry();
        let mut cards = OpenCardSet::new();
        let mut surface = HeadlessSurface::default();
        let mut display = RecordingDisplay::default();

        engine().transition(&registry, None, 2, &mut cards, &mut surface, &mut display);
        assert_eq!(surface.marker_label("site5"), Some("Sinaloa".to_string()));
        engine().transition(&registry, Some(2), 3, &mut cards, &mut surface, &mut display);
        assert!(surface.marker_visible("site5"));
        assert_eq!(surface.marker_label("site5"), None);
    }

    #[test]
    fn card_hotspot_pans_and_opens_the_numbered_card() {
        let registry = demo_registry();
        let mut cards = OpenCardSet::new();
        let mut surface = HeadlessSurface::default();
        let mut display = RecordingDisplay::default();

        engine().transition(&registry, None, 4, &mut cards, &mut surface, &mut display);
        let hotspot = registry.hotspot("site5").unwrap();
        assert_eq!(surface.center(), hotspot);
        assert!(cards.is_open("site5", 2));
    }

    #[test]
    fn target_zoom_is_clamped_to_the_configured_range() {
        let registry = demo_registry();
        let mut cards = OpenCardSet::new();
        let mut surface = HeadlessSurface::default();
        let mut display = RecordingDisplay::default();

        let tight = TransitionEngine::new(3.0, 10.0);
        tight.transition(&registry, None, 5, &mut cards, &mut surface, &mut display);
        assert_eq!(surface.zoom_value(), 10.0);
    }
}
