use std::time::Duration;

use crate::ease::Ease;
use crate::error::{WavefillError, WavefillResult};

/// Period of the built-in indeterminate ramp.
pub const INDETERMINATE_PERIOD: Duration = Duration::from_millis(5000);

/// A free-running repeating 0 -> 1 ramp, sampled by elapsed wall time.
/// Restarts at each cycle boundary and repeats forever. It has no start/stop
/// state of its own: the animator registers a repeating timer with the host
/// and samples this on each timer callback.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    period: Duration,
    ease: Ease,
}

impl Timeline {
    pub fn new(period: Duration, ease: Ease) -> WavefillResult<Self> {
        if period.is_zero() {
            return Err(WavefillError::validation("timeline period must be > 0"));
        }
        Ok(Self { period, ease })
    }

    pub fn indeterminate() -> Self {
        Self {
            period: INDETERMINATE_PERIOD,
            ease: Ease::Decelerate,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Eased progress at `elapsed` since the timeline began, wrapped into
    /// the current cycle.
    pub fn progress_at(&self, elapsed: Duration) -> f32 {
        let cycle = (elapsed.as_secs_f64() / self.period.as_secs_f64()).fract();
        self.ease.apply(cycle) as f32
    }
}
