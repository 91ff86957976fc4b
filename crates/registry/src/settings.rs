//! Tunable runtime settings for a kiosk installation.

use serde::{Deserialize, Serialize};

/// Everything an installer may tune without touching code.
///
/// Defaults match the reference installation: a 3..19 zoom range split into
/// eight layers of 128 encoder ticks each, imagery analysis debounced at
/// 400 ms and capped at two runs per second, and a ten minute idle reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct KioskConfig {
    /// Encoder ticks consumed per layer step.
    pub ticks_per_layer: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier applied to tilt vectors before converting to degrees.
    pub pan_scaler: f64,
    /// Proximity box size as a fraction of the viewport extent per side.
    pub target_fraction: f64,
    pub debounce_delay_ms: i64,
    /// Minimum center movement, in degrees, that re-qualifies an analysis.
    pub pan_threshold_deg: f64,
    pub max_analyses_per_window: usize,
    pub analysis_window_ms: i64,
    pub idle_timeout_ms: i64,
    /// Mean sample value below which imagery counts as degraded.
    pub quality_threshold: f64,
    /// Probe points sampled per analysis.
    pub sample_count: usize,
    pub home_lat: f64,
    pub home_lng: f64,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            ticks_per_layer: 128,
            min_zoom: 3.0,
            max_zoom: 19.0,
            pan_scaler: 1.0,
            target_fraction: 0.03,
            debounce_delay_ms: 400,
            pan_threshold_deg: 0.002,
            max_analyses_per_window: 2,
            analysis_window_ms: 1000,
            idle_timeout_ms: 600_000,
            quality_threshold: 1000.0,
            sample_count: 5,
            home_lat: 23.6345,
            home_lng: -102.5528,
        }
    }
}

impl KioskConfig {
    pub fn home(&self) -> foundation::geo::LatLng {
        foundation::geo::LatLng::new(self.home_lat, self.home_lng)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::KioskConfig;

    #[test]
    fn defaults_cover_eight_layers_of_128_ticks() {
        let cfg = KioskConfig::default();
        assert_eq!(cfg.ticks_per_layer, 128);
        assert_eq!(cfg.max_zoom - cfg.min_zoom, 16.0);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg: KioskConfig =
            serde_json::from_str(r#"{"idle_timeout_ms": 30000}"#).unwrap();
        assert_eq!(cfg.idle_timeout_ms, 30_000);
        assert_eq!(cfg.ticks_per_layer, KioskConfig::default().ticks_per_layer);
    }
}
