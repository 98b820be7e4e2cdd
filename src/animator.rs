use std::time::Duration;

use crate::{
    error::{WavefillError, WavefillResult},
    render::{self, OverlayPass},
    scheduler::Scheduler,
    tile::WaveTile,
    timeline::Timeline,
};

const AMPLITUDE_FACTOR: f32 = 0.15;
const SPEED_FACTOR: f32 = 0.02;

/// Construction-time parameters. `None` fields derive defaults from the
/// surface dimensions: amplitude `max(8, 0.15·height)`, wavelength `width`,
/// step `max(1, 0.02·width)`.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct WaveConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub amplitude: Option<u32>,
    #[serde(default)]
    pub wavelength: Option<u32>,
    #[serde(default)]
    pub step: Option<u32>,
}

impl WaveConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            amplitude: None,
            wavelength: None,
            step: None,
        }
    }
}

/// Alpha behavior reported to a drawable-like host. The overlay preserves
/// the content's own alpha and draws nothing outside it, so it always
/// blends against what is beneath it; hosts must not skip drawing there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Opacity {
    Translucent,
}

/// The wave state machine: progress and water level, per-tick offset
/// advance, tile rebuilds on geometry changes, and tick/timeline
/// registration through the host [`Scheduler`].
///
/// Single-threaded by design: the host delivers ticks, timeline callbacks,
/// setter calls and renders on one logical thread. A multi-threaded host
/// wraps the whole animator in its own mutex.
pub struct WaveAnimator<S: Scheduler> {
    width: u32,
    height: u32,
    amplitude: u32,
    wavelength: u32,
    step: u32,
    progress: f32,
    offset: u32,
    water_level: i32,
    running: bool,
    indeterminate: bool,
    timeline: Timeline,
    tile: WaveTile,
    scheduler: S,
}

impl<S: Scheduler> WaveAnimator<S> {
    pub fn new(config: WaveConfig, scheduler: S) -> WavefillResult<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(WavefillError::validation(
                "surface dimensions must be non-zero",
            ));
        }
        let WaveConfig { width, height, .. } = config;

        let default_amplitude = ((height as f32 * AMPLITUDE_FACTOR) as u32).max(8);
        let default_step = ((width as f32 * SPEED_FACTOR) as u32).max(1);

        let amplitude = clamp_amplitude(config.amplitude.unwrap_or(default_amplitude), height);
        let wavelength = clamp_wavelength(config.wavelength.unwrap_or(width), width);
        let step = clamp_step(config.step.unwrap_or(default_step), width);

        let tile = WaveTile::build(width, wavelength, amplitude)?;

        Ok(Self {
            width,
            height,
            amplitude,
            wavelength,
            step,
            progress: 0.0,
            offset: 0,
            water_level: height as i32,
            running: false,
            indeterminate: false,
            timeline: Timeline::indeterminate(),
            tile,
            scheduler,
        })
    }

    /// Set the wave amplitude in pixels, clamped to `[0, height/2]`.
    /// Rebuilds the tile when the effective value changes.
    pub fn set_amplitude(&mut self, amplitude: u32) -> WavefillResult<()> {
        let amplitude = clamp_amplitude(amplitude, self.height);
        if amplitude == self.amplitude {
            return Ok(());
        }
        self.amplitude = amplitude;
        self.tile = WaveTile::build(self.width, self.wavelength, amplitude)?;
        self.update_water_level();
        self.scheduler.request_redraw();
        tracing::debug!(amplitude, "rebuilt wave tile");
        Ok(())
    }

    /// Set the wavelength in pixels, clamped to `[8, 2·width]`. Rebuilds the
    /// tile when the effective value changes and re-wraps the offset so it
    /// stays within one period.
    pub fn set_wavelength(&mut self, wavelength: u32) -> WavefillResult<()> {
        let wavelength = clamp_wavelength(wavelength, self.width);
        if wavelength == self.wavelength {
            return Ok(());
        }
        self.wavelength = wavelength;
        self.offset %= wavelength;
        self.tile = WaveTile::build(self.width, wavelength, self.amplitude)?;
        self.scheduler.request_redraw();
        tracing::debug!(wavelength, "rebuilt wave tile");
        Ok(())
    }

    /// Set the per-tick advance in pixels, clamped to at most `width/2`.
    /// Takes effect on the next tick; no rebuild.
    pub fn set_speed(&mut self, step: u32) {
        self.step = clamp_step(step, self.width);
    }

    /// Externally driven fill level. Clamped to `[0, 1]`; ignored while the
    /// indeterminate timeline owns progress.
    pub fn set_progress(&mut self, progress: f32) {
        if self.indeterminate {
            return;
        }
        self.apply_progress(progress);
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.scheduler.start_frame_ticks();
        tracing::debug!("wave animation started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduler.stop_frame_ticks();
        tracing::debug!("wave animation stopped");
    }

    /// Toggle the free-running indeterminate ramp. The ramp's repeating
    /// timer is registered independently of the tick loop and keeps firing
    /// while the animation is stopped; its effect only becomes visible once
    /// redraws are serviced again.
    pub fn set_indeterminate(&mut self, on: bool) {
        if on == self.indeterminate {
            return;
        }
        self.indeterminate = on;
        if on {
            self.scheduler.start_timeline(self.timeline.period());
        } else {
            self.scheduler.stop_timeline();
        }
    }

    /// Timeline timer callback: sample the ramp at `elapsed` since
    /// registration and feed it into progress. Stray callbacks after the
    /// mode was switched off are ignored.
    pub fn on_timeline(&mut self, elapsed: Duration) {
        if !self.indeterminate {
            return;
        }
        let p = self.timeline.progress_at(elapsed);
        self.apply_progress(p);
    }

    /// Per-frame tick: advance the lateral offset and wrap it into
    /// `[0, wavelength)`. Stray ticks while stopped are ignored.
    pub fn on_tick(&mut self) {
        if !self.running {
            return;
        }
        self.offset = (self.offset + self.step) % self.wavelength;
        self.scheduler.request_redraw();
    }

    /// Composite the overlay for the current frame: `content` in, `out`
    /// out, both premultiplied RGBA8 of `width × height`.
    pub fn render(&self, content: &[u8], out: &mut [u8]) -> WavefillResult<()> {
        let pass = OverlayPass {
            width: self.width,
            height: self.height,
            water_level: self.water_level,
            offset: self.offset,
            progress: self.progress,
            tile: &self.tile,
        };
        render::compose(&pass, content, out)
    }

    fn apply_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
        self.update_water_level();
        self.scheduler.request_redraw();
    }

    fn update_water_level(&mut self) {
        let span = (self.height + 2 * self.amplitude) as f32;
        self.water_level = self.height as i32 - (span * self.progress).round() as i32;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn amplitude(&self) -> u32 {
        self.amplitude
    }

    pub fn wavelength(&self) -> u32 {
        self.wavelength
    }

    pub fn speed(&self) -> u32 {
        self.step
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Pixels from the top of the surface down to the wave midline.
    /// Negative once the wave has risen fully above the surface.
    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub fn opacity(&self) -> Opacity {
        Opacity::Translucent
    }

    pub fn tile(&self) -> &WaveTile {
        &self.tile
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

fn clamp_amplitude(v: u32, height: u32) -> u32 {
    v.min(height / 2)
}

fn clamp_wavelength(v: u32, width: u32) -> u32 {
    v.min(width.saturating_mul(2)).max(8)
}

fn clamp_step(v: u32, width: u32) -> u32 {
    v.min(width / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::NullScheduler;

    fn animator(width: u32, height: u32) -> WaveAnimator<NullScheduler> {
        WaveAnimator::new(WaveConfig::new(width, height), NullScheduler).unwrap()
    }

    #[test]
    fn defaults_derive_from_dimensions() {
        let a = animator(200, 100);
        assert_eq!(a.amplitude(), 15);
        assert_eq!(a.wavelength(), 200);
        assert_eq!(a.speed(), 4);
        assert_eq!(a.progress(), 0.0);
        assert_eq!(a.water_level(), 100);
    }

    #[test]
    fn small_surfaces_clamp_the_default_amplitude() {
        // 0.15 * 20 = 3, raised to the 8-pixel floor.
        let a = animator(64, 20);
        assert_eq!(a.amplitude(), 8);

        // The floor itself is still clamped to half the surface height.
        let a = animator(64, 10);
        assert_eq!(a.amplitude(), 5);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(WaveAnimator::new(WaveConfig::new(0, 10), NullScheduler).is_err());
        assert!(WaveAnimator::new(WaveConfig::new(10, 0), NullScheduler).is_err());
    }

    #[test]
    fn water_level_midpoint_scenario() {
        let mut a = animator(200, 100);
        a.set_progress(0.5);
        assert_eq!(a.water_level(), 35);
    }

    #[test]
    fn water_level_extremes() {
        let mut a = animator(200, 100);
        a.set_progress(0.0);
        assert_eq!(a.water_level(), 100);
        a.set_progress(1.0);
        assert_eq!(a.water_level(), -(2 * a.amplitude() as i32));
    }

    #[test]
    fn water_level_is_monotonic_in_progress() {
        let mut a = animator(200, 100);
        let mut prev = i32::MAX;
        for i in 0..=20 {
            a.set_progress(i as f32 / 20.0);
            assert!(a.water_level() <= prev);
            prev = a.water_level();
        }
    }

    #[test]
    fn progress_is_clamped() {
        let mut a = animator(200, 100);
        a.set_progress(1.5);
        assert_eq!(a.progress(), 1.0);
        a.set_progress(-0.5);
        assert_eq!(a.progress(), 0.0);
    }

    #[test]
    fn offset_advances_and_wraps() {
        let mut a = animator(200, 100);
        a.start();
        for _ in 0..10 {
            a.on_tick();
        }
        assert_eq!(a.offset(), 40);

        let mut a = animator(200, 100);
        a.set_wavelength(30).unwrap();
        a.start();
        for _ in 0..10 {
            a.on_tick();
        }
        assert_eq!(a.offset(), 10);
    }

    #[test]
    fn offset_stays_within_wavelength() {
        let mut a = animator(64, 64);
        a.set_wavelength(9).unwrap();
        a.set_speed(32);
        a.start();
        for _ in 0..100 {
            a.on_tick();
            assert!(a.offset() < a.wavelength());
        }
    }

    #[test]
    fn ticks_are_ignored_while_stopped() {
        let mut a = animator(200, 100);
        a.on_tick();
        assert_eq!(a.offset(), 0);
        a.start();
        a.on_tick();
        assert_eq!(a.offset(), 4);
        a.stop();
        a.on_tick();
        assert_eq!(a.offset(), 4);
    }

    #[test]
    fn setter_clamps_match_the_surface() {
        let mut a = animator(200, 100);
        a.set_amplitude(500).unwrap();
        assert_eq!(a.amplitude(), 50);
        a.set_wavelength(1).unwrap();
        assert_eq!(a.wavelength(), 8);
        a.set_wavelength(10_000).unwrap();
        assert_eq!(a.wavelength(), 400);
        a.set_speed(500);
        assert_eq!(a.speed(), 100);
    }

    #[test]
    fn shrinking_wavelength_rewraps_offset() {
        let mut a = animator(200, 100);
        a.set_speed(90);
        a.start();
        a.on_tick();
        assert_eq!(a.offset(), 90);
        a.set_wavelength(16).unwrap();
        assert!(a.offset() < 16);
    }

    #[test]
    fn amplitude_change_keeps_water_level_invariant() {
        let mut a = animator(200, 100);
        a.set_progress(0.5);
        a.set_amplitude(30).unwrap();
        // level = 100 - round((100 + 60) * 0.5)
        assert_eq!(a.water_level(), 20);
    }

    #[test]
    fn geometry_setters_rebuild_the_tile() {
        let mut a = animator(200, 100);
        let before = a.tile().height();
        a.set_amplitude(30).unwrap();
        assert_eq!(a.tile().height(), 60);
        assert_ne!(a.tile().height(), before);

        a.set_wavelength(50).unwrap();
        assert_eq!(a.tile().width() % 50, 0);
    }

    #[test]
    fn indeterminate_mode_owns_progress() {
        let mut a = animator(200, 100);
        a.set_indeterminate(true);
        a.set_progress(0.7);
        assert_eq!(a.progress(), 0.0);

        a.on_timeline(Duration::from_millis(2500));
        assert!(a.progress() > 0.5);

        a.set_indeterminate(false);
        a.on_timeline(Duration::from_millis(4999));
        assert!(a.progress() < 0.99);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut a = animator(200, 100);
        a.start();
        a.start();
        assert!(a.is_running());
        a.stop();
        a.stop();
        assert!(!a.is_running());
    }

    #[test]
    fn reports_translucent_opacity() {
        let a = animator(16, 16);
        assert_eq!(a.opacity(), Opacity::Translucent);
    }
}
