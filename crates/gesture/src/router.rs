//! Gesture interpretation: spin accumulation and tilt panning.

use foundation::time::TimestampMs;
use registry::layer::Visibility;
use registry::registry::LayerRegistry;
use registry::settings::KioskConfig;
use runtime::event_bus::EventBus;
use tracing::debug;

use crate::cards::OpenCardSet;
use crate::surface::{KioskDisplay, MapSurface};
use crate::target::{paint_target, targets_in_box};
use crate::transition::TransitionEngine;

/// Pan sensitivity factor for the current zoom, interpolated linearly
/// between the configured zoom bounds. Sensitivity relative to the
/// viewport extent grows with zoom, but the extent itself shrinks much
/// faster, so perceived movement slows down as the table zooms in.
fn zoom_pan_factor(cfg: &KioskConfig, zoom: f64) -> f64 {
    let lo = cfg.min_zoom + 7.0;
    let hi = cfg.max_zoom - 3.0;
    lo + (lo - hi) / (cfg.min_zoom - cfg.max_zoom) * (zoom - cfg.min_zoom)
}

/// Turns accumulated encoder ticks into layer transitions and tilt
/// vectors into viewport pans.
///
/// The position counter clamps at zero after every delta, so spinning far
/// counter-clockwise never builds up a deficit the visitor has to unwind.
/// The proposed layer index is `position / ticks_per_layer`, clamped to
/// the table; when the imagery gate is closed, upward proposals are
/// suppressed but the position still accumulates, so closing the gate
/// never eats the visitor's rotation.
#[derive(Debug, Default)]
pub struct GestureRouter {
    position: i64,
    current_layer: Option<usize>,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn current_layer(&self) -> Option<usize> {
        self.current_layer
    }

    pub fn reset_position(&mut self) {
        self.position = 0;
    }

    /// Force the layer index without running a transition. Used by the
    /// session's idle reset, which runs the transition itself.
    pub fn set_layer(&mut self, layer: usize) {
        self.current_layer = Some(layer);
    }

    /// Apply one spin delta. Returns true when a transition ran.
    #[allow(clippy::too_many_arguments)]
    pub fn on_spin(
        &mut self,
        now: TimestampMs,
        delta: i64,
        zoom_in_allowed: bool,
        registry: &LayerRegistry,
        cfg: &KioskConfig,
        engine: &TransitionEngine,
        cards: &mut OpenCardSet,
        bus: &mut EventBus,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) -> bool {
        self.position = (self.position + delta).max(0);
        let proposed = registry.clamp_index(self.position / i64::from(cfg.ticks_per_layer));

        if self.current_layer == Some(proposed) {
            return false;
        }
        let going_up = self.current_layer.map_or(false, |current| proposed > current);
        if going_up && !zoom_in_allowed {
            bus.emit(
                now,
                "gate",
                format!(
                    "zoom-in to layer {proposed} suppressed, imagery exhausted at current level"
                ),
            );
            debug!(proposed, "upward transition suppressed by imagery gate");
            return false;
        }

        engine.transition(registry, self.current_layer, proposed, cards, surface, display);
        self.current_layer = Some(proposed);
        self.after_viewport_change(now, registry, cfg, cards, bus, surface, display);
        true
    }

    /// Apply one tilt vector. Returns true when the viewport moved.
    #[allow(clippy::too_many_arguments)]
    pub fn on_pan(
        &mut self,
        now: TimestampMs,
        x: f64,
        y: f64,
        registry: &LayerRegistry,
        cfg: &KioskConfig,
        cards: &mut OpenCardSet,
        bus: &mut EventBus,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) -> bool {
        if x == 0.0 && y == 0.0 {
            return false;
        }
        let Some(layer) = self.current_layer.and_then(|i| registry.layer(i)) else {
            return false;
        };
        if !layer.pannable {
            return false;
        }
        let Some(bounds) = surface.bounds() else {
            return false;
        };

        let factor = zoom_pan_factor(cfg, surface.zoom());
        let step_lng = bounds.width() * cfg.pan_scaler * x * factor / cfg.max_zoom;
        let step_lat = bounds.height() * cfg.pan_scaler * y * factor / cfg.max_zoom;

        let center = surface.center();
        // Keep the viewport clear of the poles.
        let lat_limit = 89.0 - bounds.height() * 0.5;
        let lat = (center.lat + step_lat).clamp(-lat_limit, lat_limit);
        let lng = center.lng + step_lng;
        surface.pan_to(foundation::geo::LatLng::new(lat, lng));

        self.after_viewport_change(now, registry, cfg, cards, bus, surface, display);
        true
    }

    /// Hotspot proximity pass, run after anything that moves the center.
    fn after_viewport_change(
        &self,
        now: TimestampMs,
        registry: &LayerRegistry,
        cfg: &KioskConfig,
        cards: &mut OpenCardSet,
        bus: &mut EventBus,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) {
        let Some(layer) = self.current_layer.and_then(|i| registry.layer(i)) else {
            return;
        };
        let hunting = layer
            .visibility
            .values()
            .any(|v| matches!(v, Visibility::MarkerReference(_)));
        if hunting {
            if let Some(bounds) = surface.bounds() {
                let matches = targets_in_box(registry, layer, &bounds, cfg.target_fraction);
                match matches.split_first() {
                    Some(((_, target), rest)) => {
                        let sequence = layer.image_sequence_index.unwrap_or(0);
                        cards.open(target, sequence, display);
                        for (key, extra) in rest {
                            bus.emit(
                                now,
                                "proximity",
                                format!("{key} -> {extra} also in range, card already claimed"),
                            );
                        }
                    }
                    None => cards.close_all(display),
                }
            }
        }
        paint_target(registry, layer, surface, cfg.target_fraction);
    }
}

#[cfg(test)]
mod tests {
    use foundation::geo::LatLng;
    use foundation::time::TimestampMs;
    use registry::demo::demo_registry;
    use registry::settings::KioskConfig;
    use runtime::event_bus::EventBus;

    use super::GestureRouter;
    use crate::cards::OpenCardSet;
    use crate::headless::{HeadlessSurface, RecordingDisplay};
    use crate::surface::MapSurface;
    use crate::transition::TransitionEngine;

    struct Rig {
        registry: registry::registry::LayerRegistry,
        cfg: KioskConfig,
        engine: TransitionEngine,
        cards: OpenCardSet,
        bus: EventBus,
        surface: HeadlessSurface,
        display: RecordingDisplay,
        router: GestureRouter,
    }

    impl Rig {
        fn new() -> Self {
            let cfg = KioskConfig::default();
            Self {
                registry: demo_registry(),
                engine: TransitionEngine::new(cfg.min_zoom, cfg.max_zoom),
                cfg,
                cards: OpenCardSet::new(),
                bus: EventBus::new(),
                surface: HeadlessSurface::default(),
                display: RecordingDisplay::default(),
                router: GestureRouter::new(),
            }
        }

        fn spin(&mut self, at: i64, delta: i64, allowed: bool) -> bool {
            self.router.on_spin(
                TimestampMs(at),
                delta,
                allowed,
                &self.registry,
                &self.cfg,
                &self.engine,
                &mut self.cards,
                &mut self.bus,
                &mut self.surface,
                &mut self.display,
            )
        }

        fn pan(&mut self, at: i64, x: f64, y: f64) -> bool {
            self.router.on_pan(
                TimestampMs(at),
                x,
                y,
                &self.registry,
                &self.cfg,
                &mut self.cards,
                &mut self.bus,
                &mut self.surface,
                &mut self.display,
            )
        }
    }

    #[test]
    fn position_clamps_at_zero_between_deltas() {
        let mut rig = Rig::new();
        rig.spin(0, -500, true);
        assert_eq!(rig.router.position(), 0);
        rig.spin(10, 100, true);
        assert_eq!(rig.router.position(), 100);
    }

    #[test]
    fn layer_boundary_is_exact_at_multiples_of_ticks_per_layer() {
        let mut rig = Rig::new();
        rig.spin(0, 127, true);
        assert_eq!(rig.router.current_layer(), Some(0));
        rig.spin(10, 1, true);
        assert_eq!(rig.router.current_layer(), Some(1));
        rig.spin(20, 128 * 2, true);
        assert_eq!(rig.router.current_layer(), Some(3));
    }

    #[test]
    fn proposed_layer_clamps_to_the_table_end() {
        let mut rig = Rig::new();
        rig.spin(0, 128 * 50, true);
        assert_eq!(rig.router.current_layer(), Some(rig.registry.len() - 1));
    }

    #[test]
    fn closed_gate_suppresses_the_climb_but_keeps_the_position() {
        let mut rig = Rig::new();
        rig.spin(0, 128, true);
        assert_eq!(rig.router.current_layer(), Some(1));

        assert!(!rig.spin(10, 128, false));
        assert_eq!(rig.router.current_layer(), Some(1));
        assert_eq!(rig.router.position(), 256, "rotation is never eaten");
        assert_eq!(rig.bus.events().len(), 1);
        assert_eq!(rig.bus.events()[0].kind, "gate");

        // Re-opening the gate lets the already-earned position through.
        assert!(rig.spin(20, 0, true));
        assert_eq!(rig.router.current_layer(), Some(2));
    }

    #[test]
    fn closed_gate_still_allows_zooming_out() {
        let mut rig = Rig::new();
        rig.spin(0, 128 * 3, true);
        assert_eq!(rig.router.current_layer(), Some(3));
        assert!(rig.spin(10, -128 * 2, false));
        assert_eq!(rig.router.current_layer(), Some(1));
    }

    #[test]
    fn zero_tilt_vector_is_a_complete_no_op() {
        let mut rig = Rig::new();
        rig.spin(0, 128 * 2, true);
        let center = rig.surface.center();
        assert!(!rig.pan(10, 0.0, 0.0));
        assert_eq!(rig.surface.center(), center);
    }

    #[test]
    fn non_pannable_layer_ignores_tilt() {
        let mut rig = Rig::new();
        rig.spin(0, 0, true); // layer 0, not pannable
        assert!(!rig.pan(10, 0.5, 0.5));
    }

    #[test]
    fn tilt_moves_the_center_on_a_pannable_layer() {
        let mut rig = Rig::new();
        rig.spin(0, 128 * 2, true); // layer 2, pannable
        let before = rig.surface.center();
        assert!(rig.pan(10, 0.5, 0.25));
        let after = rig.surface.center();
        assert!(after.lng > before.lng);
        assert!(after.lat > before.lat);
    }

    #[test]
    fn latitude_clamps_short_of_the_poles() {
        let mut rig = Rig::new();
        rig.spin(0, 128 * 2, true);
        for t in 0..500 {
            rig.pan(t, 0.0, 1.0);
        }
        let bounds = rig.surface.bounds().unwrap();
        assert!(bounds.north_east.lat <= 89.0 + 1e-9);
    }

    #[test]
    fn panning_onto_a_hotspot_opens_its_card() {
        let mut rig = Rig::new();
        rig.spin(0, 128 * 2, true); // layer 2: Sinaloa -> site5, card seq 1
        let hotspot = rig.registry.hotspot("site5").unwrap();
        rig.surface.pan_to(hotspot);
        assert!(rig.pan(10, 0.001, 0.0));
        assert!(rig.cards.is_open("site5", 1));

        // Pan far away: the proximity pass closes everything.
        rig.surface.pan_to(LatLng::new(20.0, -100.0));
        assert!(rig.pan(20, 0.001, 0.0));
        assert!(!rig.cards.any_open());
    }
}
