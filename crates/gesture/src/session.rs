//! The session: one per kiosk process, owning all mutable state.

use foundation::time::{DurationMs, TimestampMs};
use gate::controller::{DetectorSettings, QualityGateController};
use gate::gate::GateVerdict;
use gate::sampler::ImagerySampler;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use registry::registry::LayerRegistry;
use registry::settings::KioskConfig;
use runtime::event_bus::{Event, EventBus};
use runtime::idle::IdleTimer;
use transport::protocol::{GestureMessage, Inbound, TelemetryMessage};

use crate::cards::OpenCardSet;
use crate::router::GestureRouter;
use crate::surface::{KioskDisplay, MapSurface};
use crate::target::paint_target;
use crate::transition::TransitionEngine;

/// Everything the kiosk mutates at runtime, behind one owner.
///
/// The driver loop feeds it decoded transport frames plus the three
/// viewport signals (zoom changed, center changed, tiles loaded) and a
/// periodic tick; all methods take the current time explicitly.
pub struct Session {
    registry: LayerRegistry,
    cfg: KioskConfig,
    router: GestureRouter,
    engine: TransitionEngine,
    cards: OpenCardSet,
    detector: QualityGateController,
    idle: IdleTimer,
    bus: EventBus,
    rng: SmallRng,
}

impl Session {
    pub fn new(registry: LayerRegistry, cfg: KioskConfig, seed: u64) -> Self {
        let detector = QualityGateController::new(
            DetectorSettings {
                debounce_delay: DurationMs::millis(cfg.debounce_delay_ms),
                pan_threshold_deg: cfg.pan_threshold_deg,
                max_analyses_per_window: cfg.max_analyses_per_window,
                analysis_window: DurationMs::millis(cfg.analysis_window_ms),
                quality_threshold: cfg.quality_threshold,
                sample_count: cfg.sample_count,
            },
            cfg.min_zoom,
        );
        Self {
            engine: TransitionEngine::new(cfg.min_zoom, cfg.max_zoom),
            idle: IdleTimer::new(DurationMs::millis(cfg.idle_timeout_ms)),
            detector,
            cfg,
            registry,
            router: GestureRouter::new(),
            cards: OpenCardSet::new(),
            bus: EventBus::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn router(&self) -> &GestureRouter {
        &self.router
    }

    pub fn cards(&self) -> &OpenCardSet {
        &self.cards
    }

    pub fn zoom_in_allowed(&self) -> bool {
        self.detector.zoom_in_allowed()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    /// Route one decoded inbound frame.
    pub fn handle(
        &mut self,
        now: TimestampMs,
        inbound: &Inbound,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) {
        match inbound {
            Inbound::Gesture(GestureMessage::Zoom { vector }) => {
                self.spin(now, vector.delta, surface, display);
                self.idle.kick(now);
            }
            Inbound::Gesture(GestureMessage::Pan { vector }) => {
                if self.pan(now, vector.x, vector.y, surface, display) {
                    self.idle.kick(now);
                }
            }
            Inbound::Gesture(GestureMessage::Combo { vector }) => {
                let moved = self.pan(now, vector.x, vector.y, surface, display);
                let stepped = self.spin(now, vector.delta, surface, display);
                if moved || stepped || vector.delta != 0 {
                    self.idle.kick(now);
                }
            }
            Inbound::Telemetry(TelemetryMessage::Spin { packet }) => {
                display.log_message(&format!(
                    "[{}] encoder {} at {} (delta {})",
                    packet.sensor_id,
                    packet.encoder_index,
                    packet.encoder_position,
                    packet.encoder_delta,
                ));
            }
            Inbound::Telemetry(TelemetryMessage::Tilt { packet }) => {
                display.log_message(&format!(
                    "[{}] tilt ({:.3}, {:.3}) |{:.3}|",
                    packet.sensor_id, packet.tilt_x, packet.tilt_y, packet.tilt_magnitude,
                ));
            }
            Inbound::Unknown(raw) => {
                display.log_message(&format!("unrecognized message: {raw}"));
            }
        }
    }

    fn spin(
        &mut self,
        now: TimestampMs,
        delta: i64,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) -> bool {
        self.router.on_spin(
            now,
            delta,
            self.detector.zoom_in_allowed(),
            &self.registry,
            &self.cfg,
            &self.engine,
            &mut self.cards,
            &mut self.bus,
            surface,
            display,
        )
    }

    fn pan(
        &mut self,
        now: TimestampMs,
        x: f64,
        y: f64,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) -> bool {
        self.router.on_pan(
            now,
            x,
            y,
            &self.registry,
            &self.cfg,
            &mut self.cards,
            &mut self.bus,
            surface,
            display,
        )
    }

    /// Provider reported a zoom change. The center rides along because a
    /// scheduled analysis pins the pan-distance reference to it.
    pub fn on_zoom_changed(&mut self, now: TimestampMs, zoom: f64, center: foundation::geo::LatLng) {
        self.detector.on_zoom_changed(now, zoom, center);
    }

    /// Provider reported a center change.
    pub fn on_center_changed(&mut self, now: TimestampMs, center: foundation::geo::LatLng) {
        self.detector.on_center_changed(now, center);
    }

    /// Provider reported that tiles for the settled viewport finished
    /// loading; runs the armed imagery analysis, if any.
    pub fn on_tiles_loaded(
        &mut self,
        now: TimestampMs,
        surface: &impl MapSurface,
        sampler: &mut impl ImagerySampler,
    ) {
        let Some(bounds) = surface.bounds() else {
            return;
        };
        match self.detector.on_tiles_loaded(&bounds, sampler, &mut self.rng) {
            Some(GateVerdict::Blocked {
                max_useful_zoom,
                tried_zoom,
            }) => {
                self.bus.emit(
                    now,
                    "gate",
                    format!(
                        "imagery degraded at zoom {tried_zoom}, max useful zoom {max_useful_zoom}"
                    ),
                );
            }
            Some(GateVerdict::Allowed { zoom }) => {
                self.bus
                    .emit(now, "gate", format!("imagery acceptable at zoom {zoom}"));
            }
            None => {}
        }
    }

    /// Periodic heartbeat: pumps the analysis debounce and the idle timer.
    pub fn tick(
        &mut self,
        now: TimestampMs,
        surface: &mut impl MapSurface,
        display: &mut impl KioskDisplay,
    ) {
        self.detector.tick(now, surface.zoom());
        if self.idle.expired(now) {
            self.bus
                .emit(now, "idle", "no visitors, returning to the first layer");
            self.reset(surface, display);
        }
    }

    /// Return to the resting state: first layer, home center, no cards.
    fn reset(&mut self, surface: &mut impl MapSurface, display: &mut impl KioskDisplay) {
        self.cards.close_all(display);
        let from = self.router.current_layer();
        self.engine
            .transition(&self.registry, from, 0, &mut self.cards, surface, display);
        self.router.reset_position();
        self.router.set_layer(0);
        surface.pan_to(self.cfg.home());
        if let Some(layer) = self.registry.layer(0) {
            paint_target(&self.registry, layer, surface, self.cfg.target_fraction);
        }
    }
}
