//! The imagery quality gate itself.
//!
//! Keeps the deepest zoom level at which imagery last looked useful and
//! decides, after each analysis, whether zooming further in stays enabled.

use foundation::geo::GeoBounds;
use rand::Rng;
use tracing::debug;

use crate::sampler::{sample_points, ImagerySampler};

/// Outcome of one completed analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateVerdict {
    /// Imagery is acceptable (or we are not past the last known good
    /// level); zooming in stays enabled.
    Allowed { zoom: f64 },
    /// Imagery degraded beyond the last known good level; zooming in is
    /// disabled until a later analysis passes.
    Blocked {
        max_useful_zoom: f64,
        tried_zoom: f64,
    },
}

#[derive(Debug, Clone, Copy)]
struct PendingEvaluation {
    viewport_zoom: f64,
    reason: &'static str,
}

/// Tracks imagery usefulness across zoom levels.
///
/// Evaluation is two-phase: [`request_evaluation`](Self::request_evaluation)
/// arms an analysis for the current viewport, and
/// [`on_tiles_loaded`](Self::on_tiles_loaded) runs it once the tiles for
/// that viewport have settled. A request made while one is already armed
/// joins it rather than stacking a second analysis.
#[derive(Debug, Clone)]
pub struct ImageryQualityGate {
    threshold: f64,
    sample_count: usize,
    last_known_good_zoom: f64,
    zoom_in_allowed: bool,
    pending: Option<PendingEvaluation>,
}

impl ImageryQualityGate {
    pub fn new(threshold: f64, sample_count: usize, initial_zoom: f64) -> Self {
        Self {
            threshold,
            sample_count,
            last_known_good_zoom: initial_zoom,
            zoom_in_allowed: true,
            pending: None,
        }
    }

    pub fn zoom_in_allowed(&self) -> bool {
        self.zoom_in_allowed
    }

    pub fn last_known_good_zoom(&self) -> f64 {
        self.last_known_good_zoom
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm an analysis for the given viewport zoom. Returns `false` when an
    /// analysis is already armed; the new request joins it.
    pub fn request_evaluation(&mut self, viewport_zoom: f64, reason: &'static str) -> bool {
        if let Some(pending) = &self.pending {
            debug!(
                reason,
                joined = pending.reason,
                "analysis already armed, coalescing"
            );
            return false;
        }
        self.pending = Some(PendingEvaluation {
            viewport_zoom,
            reason,
        });
        true
    }

    /// Run the armed analysis over the settled viewport, if any.
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
        let pending = self.pending.take()?;
        let points = sample_points(bounds, self.sample_count, rng);
        let mean = points
            .iter()
            .map(|p| sampler.sample_quality_at(*p))
            .sum::<f64>()
            / points.len().max(1) as f64;

        let zoom = pending.viewport_zoom;
        let verdict = if mean < self.threshold && zoom > self.last_known_good_zoom {
            self.zoom_in_allowed = false;
            GateVerdict::Blocked {
                max_useful_zoom: self.last_known_good_zoom,
                tried_zoom: zoom,
            }
        } else {
            // Passing at a shallower zoom deliberately lowers the ceiling:
            // imagery quality varies by region, not just by zoom.
            self.last_known_good_zoom = zoom;
            self.zoom_in_allowed = true;
            GateVerdict::Allowed { zoom }
        };
        debug!(reason = pending.reason, zoom, mean, ?verdict, "analysis complete");
        Some(verdict)
    }
}

#[cfg(test)]
mod tests {
    use foundation::geo::{GeoBounds, LatLng};
    use pretty_assertions::assert_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{GateVerdict, ImageryQualityGate};
    use crate::sampler::FixedQualitySampler;

    fn bounds() -> GeoBounds {
        GeoBounds::new(LatLng::new(24.0, -109.0), LatLng::new(26.0, -106.0))
    }

    fn run(
        gate: &mut ImageryQualityGate,
        zoom: f64,
        quality: f64,
    ) -> Option<GateVerdict> {
        gate.request_evaluation(zoom, "test");
        gate.on_tiles_loaded(
            &bounds(),
            &mut FixedQualitySampler(quality),
            &mut SmallRng::seed_from_u64(1),
        )
    }

    #[test]
    fn degraded_imagery_past_last_good_blocks_zoom_in() {
        let mut gate = ImageryQualityGate::new(1000.0, 5, 14.0);
        let verdict = run(&mut gate, 15.0, 800.0);
        assert_eq!(
            verdict,
            Some(GateVerdict::Blocked {
                max_useful_zoom: 14.0,
                tried_zoom: 15.0
            })
        );
        assert!(!gate.zoom_in_allowed());
        assert_eq!(gate.last_known_good_zoom(), 14.0);
    }

    #[test]
    fn degraded_imagery_at_or_below_last_good_still_passes() {
        let mut gate = ImageryQualityGate::new(1000.0, 5, 14.0);
        let verdict = run(&mut gate, 13.0, 800.0);
        assert_eq!(verdict, Some(GateVerdict::Allowed { zoom: 13.0 }));
        // The ceiling follows the passed zoom, even downward.
        assert_eq!(gate.last_known_good_zoom(), 13.0);
        assert!(gate.zoom_in_allowed());
    }

    #[test]
    fn good_imagery_raises_the_ceiling_and_reenables_zoom() {
        let mut gate = ImageryQualityGate::new(1000.0, 5, 14.0);
        run(&mut gate, 15.0, 800.0);
        assert!(!gate.zoom_in_allowed());
        let verdict = run(&mut gate, 15.0, 1600.0);
        assert_eq!(verdict, Some(GateVerdict::Allowed { zoom: 15.0 }));
        assert!(gate.zoom_in_allowed());
        assert_eq!(gate.last_known_good_zoom(), 15.0);
    }

    #[test]
    fn concurrent_requests_coalesce_into_one_analysis() {
        let mut gate = ImageryQualityGate::new(1000.0, 5, 14.0);
        assert!(gate.request_evaluation(15.0, "zoom_integer_change"));
        assert!(!gate.request_evaluation(15.0, "pan_threshold"));
        let verdict = gate.on_tiles_loaded(
            &bounds(),
            &mut FixedQualitySampler(1500.0),
            &mut SmallRng::seed_from_u64(1),
        );
        assert!(verdict.is_some());
        // Nothing left armed afterwards.
        assert!(gate
            .on_tiles_loaded(
                &bounds(),
                &mut FixedQualitySampler(1500.0),
                &mut SmallRng::seed_from_u64(1),
            )
            .is_none());
    }

    #[test]
    fn no_analysis_without_a_request() {
        let mut gate = ImageryQualityGate::new(1000.0, 5, 14.0);
        assert!(gate
            .on_tiles_loaded(
                &bounds(),
                &mut FixedQualitySampler(1500.0),
                &mut SmallRng::seed_from_u64(1),
            )
            .is_none());
    }
}
