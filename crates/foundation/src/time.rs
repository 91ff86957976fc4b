/// Time primitives.
///
/// All control logic takes explicit timestamps so it can be driven
/// deterministically in tests; only the binary touches the wall clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampMs(pub i64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DurationMs(pub i64);

impl TimestampMs {
    pub fn offset(self, d: DurationMs) -> Self {
        TimestampMs(self.0 + d.0)
    }

    /// Time elapsed since `earlier`; negative if `earlier` is in the future.
    pub fn since(self, earlier: TimestampMs) -> DurationMs {
        DurationMs(self.0 - earlier.0)
    }
}

impl DurationMs {
    pub const fn millis(ms: i64) -> Self {
        DurationMs(ms)
    }

    pub const fn seconds(s: i64) -> Self {
        DurationMs(s * 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::{DurationMs, TimestampMs};

    #[test]
    fn offset_and_since_round_trip() {
        let t0 = TimestampMs(1_000);
        let t1 = t0.offset(DurationMs::millis(400));
        assert_eq!(t1, TimestampMs(1_400));
        assert_eq!(t1.since(t0), DurationMs(400));
        assert_eq!(t0.since(t1), DurationMs(-400));
    }

    #[test]
    fn seconds_scale_to_millis() {
        assert_eq!(DurationMs::seconds(2), DurationMs(2_000));
    }
}
