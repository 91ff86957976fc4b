//! Imagery quality probing.
//!
//! The gate never talks to the tile provider directly; it asks an
//! [`ImagerySampler`] for a scalar quality reading at a point. Production
//! wires in a detector over the rendered tiles, tests use
//! [`FixedQualitySampler`].

use foundation::geo::{GeoBounds, LatLng};
use rand::Rng;

/// Source of per-point imagery quality readings.
///
/// Higher is better; readings are compared against a configured threshold
/// by the gate. `&mut self` because real samplers cache decoded tiles.
pub trait ImagerySampler {
    fn sample_quality_at(&mut self, point: LatLng) -> f64;
}

/// Sampler returning the same reading everywhere. Test double, and the
/// fallback when no detector is wired in.
#[derive(Debug, Clone, Copy)]
pub struct FixedQualitySampler(pub f64);

impl ImagerySampler for FixedQualitySampler {
    fn sample_quality_at(&mut self, _point: LatLng) -> f64 {
        self.0
    }
}

/// Draw `count` uniform probe points inside the viewport bounds.
pub fn sample_points<R: Rng>(bounds: &GeoBounds, count: usize, rng: &mut R) -> Vec<LatLng> {
    (0..count)
        .map(|_| {
            let u: f64 = rng.gen_range(0.0..1.0);
            let v: f64 = rng.gen_range(0.0..1.0);
            LatLng::new(
                bounds.south_west.lat + u * bounds.height(),
                bounds.south_west.lng + v * bounds.width(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use foundation::geo::{GeoBounds, LatLng};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::sample_points;

    #[test]
    fn probe_points_fall_inside_the_viewport() {
        let bounds = GeoBounds::new(LatLng::new(24.0, -109.0), LatLng::new(26.0, -106.0));
        let mut rng = SmallRng::seed_from_u64(7);
        for p in sample_points(&bounds, 50, &mut rng) {
            assert!(bounds.contains(p), "{p:?} escaped {bounds:?}");
        }
    }

    #[test]
    fn same_seed_draws_the_same_points() {
        let bounds = GeoBounds::new(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
        let a = sample_points(&bounds, 5, &mut SmallRng::seed_from_u64(42));
        let b = sample_points(&bounds, 5, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
