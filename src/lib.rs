#![forbid(unsafe_code)]

//! A wave-fill progress overlay: a sinusoidal "water" boundary rendered
//! over an RGBA8 bitmap, rising from the bottom with fill progress.
//!
//! The wave boundary is rasterized once into a reusable [`WaveTile`] and
//! translated frame-by-frame; [`WaveAnimator`] owns the progress, water
//! level and lateral offset, and [`render::compose`] turns the current
//! state into pixels. The host drives ticks and timers through the
//! [`Scheduler`] seam.

pub mod animator;
pub mod composite;
pub mod ease;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod tile;
pub mod timeline;

pub use animator::{Opacity, WaveAnimator, WaveConfig};
pub use ease::Ease;
pub use error::{WavefillError, WavefillResult};
pub use render::{OverlayPass, PROGRESS_EPSILON};
pub use scheduler::{NullScheduler, Scheduler};
pub use tile::WaveTile;
pub use timeline::{INDETERMINATE_PERIOD, Timeline};
