//! Scheduling wrapper around the gate: debounces viewport movement, drops
//! redundant triggers, and rate limits how often analyses may run.

use foundation::geo::{GeoBounds, LatLng};
use foundation::time::{DurationMs, TimestampMs};
use rand::Rng;
use runtime::debounce::Debouncer;
use runtime::rate_limit::RateLimiter;
use tracing::debug;

use crate::gate::{GateVerdict, ImageryQualityGate};
use crate::sampler::ImagerySampler;

/// Tuning for the analysis scheduler.
#[derive(Debug, Clone, Copy)]
pub struct DetectorSettings {
    pub debounce_delay: DurationMs,
    pub pan_threshold_deg: f64,
    pub max_analyses_per_window: usize,
    pub analysis_window: DurationMs,
    pub quality_threshold: f64,
    pub sample_count: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            debounce_delay: DurationMs::millis(400),
            pan_threshold_deg: 0.002,
            max_analyses_per_window: 2,
            analysis_window: DurationMs::seconds(1),
            quality_threshold: 1000.0,
            sample_count: 5,
        }
    }
}

/// Decides *when* the gate analyses imagery.
///
/// Three filters stand between a viewport change and an analysis:
/// an integer zoom-level check (fractional zoom wobble never triggers),
/// a movement debounce with a minimum pan distance, and a sliding-window
/// rate limit. Triggers that fail a filter are dropped, not queued.
#[derive(Debug, Clone)]
pub struct QualityGateController {
    settings: DetectorSettings,
    gate: ImageryQualityGate,
    debounce: Debouncer,
    limiter: RateLimiter,
    last_zoom: Option<f64>,
    pending_center: Option<LatLng>,
    last_analysis_center: Option<LatLng>,
}

impl QualityGateController {
    pub fn new(settings: DetectorSettings, initial_zoom: f64) -> Self {
        Self {
            gate: ImageryQualityGate::new(
                settings.quality_threshold,
                settings.sample_count,
                initial_zoom,
            ),
            debounce: Debouncer::new(settings.debounce_delay),
            limiter: RateLimiter::new(),
            settings,
            last_zoom: Some(initial_zoom),
            pending_center: None,
            last_analysis_center: None,
        }
    }

    pub fn zoom_in_allowed(&self) -> bool {
        self.gate.zoom_in_allowed()
    }

    pub fn gate(&self) -> &ImageryQualityGate {
        &self.gate
    }

    /// A zoom change only matters once it crosses an integer level.
    pub fn on_zoom_changed(&mut self, now: TimestampMs, zoom: f64, center: LatLng) {
        let crossed = self
            .last_zoom
            .map_or(true, |prev| prev.floor() != zoom.floor());
        self.last_zoom = Some(zoom);
        if crossed {
            self.try_schedule(now, zoom, "zoom_integer_change", center);
        }
    }

    /// Center movement is debounced; the analysis decision happens on
    /// [`tick`](Self::tick) once movement settles.
    pub fn on_center_changed(&mut self, now: TimestampMs, center: LatLng) {
        self.pending_center = Some(center);
        self.debounce.trigger(now);
    }

    /// Drive the debounce clock. Call once per frame.
    pub fn tick(&mut self, now: TimestampMs, viewport_zoom: f64) {
        if !self.debounce.fire_due(now) {
            return;
        }
        let Some(center) = self.pending_center.take() else {
            return;
        };
        if self.pan_is_significant(center) {
            self.try_schedule(now, viewport_zoom, "pan_threshold", center);
        } else {
            debug!("pan settled below threshold, skipping analysis");
        }
    }

    /// Run the armed analysis, if any, against the settled viewport.
    pub fn on_tiles_loaded<S, R>(
        &mut self,
        bounds: &GeoBounds,
        sampler: &mut S,
        rng: &mut R,
    ) -> Option<GateVerdict>
    where
        S: ImagerySampler,
        R: Rng,
    {
        self.gate.on_tiles_loaded(bounds, sampler, rng)
    }

    fn pan_is_significant(&self, center: LatLng) -> bool {
        match self.last_analysis_center {
            // The very first movement always qualifies.
            None => true,
            Some(prev) => {
                (center.lat - prev.lat).abs() > self.settings.pan_threshold_deg
                    || (center.lng - prev.lng).abs() > self.settings.pan_threshold_deg
            }
        }
    }

    // The reference center moves on every scheduled analysis, whichever
    // trigger scheduled it, so pan distance is always measured from the
    // last analysed viewport.
    fn try_schedule(&mut self, now: TimestampMs, zoom: f64, reason: &'static str, center: LatLng) {
        if !self.limiter.allow(
            now,
            self.settings.max_analyses_per_window,
            self.settings.analysis_window,
        ) {
            debug!(reason, "analysis rate limited, dropping trigger");
            return;
        }
        self.limiter.record(now);
        self.last_analysis_center = Some(center);
        self.gate.request_evaluation(zoom, reason);
    }
}
