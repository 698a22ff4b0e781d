//! Engine configuration: price scale, lot size, depth fan-out, tick cadence,
//! and a convenience A-share session schedule.

use crate::engine::schedule::Schedule;

/// Knobs an `Engine` is constructed with. All fields have sane defaults
/// (`EngineConfig::default()`); construct with field-update syntax or the
/// `with_*` builder methods when only a couple need overriding.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Decimal places the CSV `price` column is scaled to when converted to
    /// the engine's fixed-point `Price`. `2` means cents, `4` means
    /// ten-thousandths. A price column with more fractional digits than
    /// this is an `InvalidInput` ingestion error, never a silent rounding.
    pub price_scale: u32,

    /// Quantities are truncated down to the nearest multiple of this many
    /// shares on ingestion; no other odd-lot policy is applied. `1` (the
    /// default) disables truncation.
    pub lot_size: u64,

    /// Default top-k depth captured on every tick. Overridable later via
    /// `Engine::set_topk`.
    pub topk: usize,

    /// Default nanoseconds between ticks. `0` disables tick emission.
    /// Overridable later via `Engine::set_snapshot_gap`.
    pub snapshot_gap: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_scale: 2,
            lot_size: 1,
            topk: 5,
            snapshot_gap: 0,
        }
    }
}

impl EngineConfig {
    /// An empty, unconfigured set of defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decimal places prices are scaled to (2 = cents, 4 = ten-thousandths).
    #[must_use]
    pub fn with_price_scale(mut self, scale: u32) -> Self {
        self.price_scale = scale;
        self
    }

    /// Truncate ingested quantities down to a multiple of `lot_size`.
    #[must_use]
    pub fn with_lot_size(mut self, lot_size: u64) -> Self {
        self.lot_size = lot_size;
        self
    }

    /// Top-k depth captured on every tick.
    #[must_use]
    pub fn with_topk(mut self, topk: usize) -> Self {
        self.topk = topk;
        self
    }

    /// Nanoseconds between tick emissions.
    #[must_use]
    pub fn with_snapshot_gap(mut self, ns: i64) -> Self {
        self.snapshot_gap = ns;
        self
    }
}

/// The four-interval A-share trading calendar: pre-opening call auction,
/// morning continuous session, afternoon continuous session, closing call
/// auction. A named convenience equivalent to passing a `schedule="AShare"`
/// string to a broker's own session calendar constructor.
#[must_use]
pub fn a_share_schedule() -> Schedule {
    Schedule::a_share_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_disables_lot_truncation_and_ticks() {
        let config = EngineConfig::default();
        assert_eq!(config.lot_size, 1);
        assert_eq!(config.snapshot_gap, 0);
        assert_eq!(config.topk, 5);
        assert_eq!(config.price_scale, 2);
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = EngineConfig::new()
            .with_price_scale(4)
            .with_lot_size(100)
            .with_topk(10)
            .with_snapshot_gap(1_000_000_000);
        assert_eq!(config.price_scale, 4);
        assert_eq!(config.lot_size, 100);
        assert_eq!(config.topk, 10);
        assert_eq!(config.snapshot_gap, 1_000_000_000);
    }
}
