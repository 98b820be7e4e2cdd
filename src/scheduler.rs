use std::time::Duration;

/// Outbound seam to the host: redraw notification, per-frame tick
/// registration, and the repeating timer backing the indeterminate ramp.
///
/// The host owns the actual frame source and clock. While ticks are
/// registered it calls [`WaveAnimator::on_tick`] once per display frame;
/// while the timeline timer is registered it calls
/// [`WaveAnimator::on_timeline`] with the elapsed time since registration.
/// Deregistration must guarantee no further callbacks after it returns.
///
/// [`WaveAnimator::on_tick`]: crate::animator::WaveAnimator::on_tick
/// [`WaveAnimator::on_timeline`]: crate::animator::WaveAnimator::on_timeline
pub trait Scheduler {
    /// The surface content is stale and should be redrawn.
    fn request_redraw(&mut self);

    /// Begin delivering per-frame ticks.
    fn start_frame_ticks(&mut self);

    /// Stop delivering per-frame ticks. Must be idempotent.
    fn stop_frame_ticks(&mut self);

    /// Begin a repeating timer with the given period.
    fn start_timeline(&mut self, period: Duration);

    /// Cancel the repeating timer. Must be idempotent.
    fn stop_timeline(&mut self);
}

/// Host stub for headless rendering and tests: discards every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullScheduler;

impl Scheduler for NullScheduler {
    fn request_redraw(&mut self) {}
    fn start_frame_ticks(&mut self) {}
    fn stop_frame_ticks(&mut self) {}
    fn start_timeline(&mut self, _period: Duration) {}
    fn stop_timeline(&mut self) {}
}
