use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Parser;

use wavefill::{
    Scheduler, WaveAnimator, WaveConfig,
    composite::{premultiply_in_place, unpremultiply_in_place},
};

/// Render a wave-fill progress sequence to numbered PNG frames.
#[derive(Parser, Debug)]
#[command(name = "wavefill", version)]
struct Cli {
    /// Content image (PNG etc.). Its dimensions become the surface size.
    /// When omitted, a synthesized test card is used.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Test-card width (ignored when --image is given).
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Test-card height (ignored when --image is given).
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Number of frames to render.
    #[arg(long, default_value_t = 90)]
    frames: u32,

    /// Frame rate used to map frame indices to timeline time.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Output directory for frame_NNNN.png files.
    #[arg(long, default_value = "frames")]
    out_dir: PathBuf,

    /// Drive progress from the built-in repeating ramp instead of a linear
    /// 0..1 sweep over the rendered frames.
    #[arg(long)]
    indeterminate: bool,

    /// Wave amplitude in pixels.
    #[arg(long)]
    amplitude: Option<u32>,

    /// Wavelength in pixels.
    #[arg(long)]
    wavelength: Option<u32>,

    /// Lateral advance per frame in pixels.
    #[arg(long)]
    speed: Option<u32>,
}

/// The reference host: owns the frame loop, services redraw requests by
/// writing a PNG, and delivers ticks/timeline callbacks while registered.
#[derive(Debug, Default)]
struct FrameLoop {
    redraws: u64,
    ticking: bool,
    timeline: Option<Duration>,
}

impl Scheduler for FrameLoop {
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn start_frame_ticks(&mut self) {
        self.ticking = true;
    }

    fn stop_frame_ticks(&mut self) {
        self.ticking = false;
    }

    fn start_timeline(&mut self, period: Duration) {
        self.timeline = Some(period);
    }

    fn stop_timeline(&mut self) {
        self.timeline = None;
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.frames == 0 {
        anyhow::bail!("--frames must be > 0");
    }
    if !(cli.fps.is_finite() && cli.fps > 0.0) {
        anyhow::bail!("--fps must be finite and > 0");
    }

    let (width, height, mut content) = match &cli.image {
        Some(path) => {
            let img = image::open(path)
                .with_context(|| format!("open content image '{}'", path.display()))?
                .to_rgba8();
            let (w, h) = img.dimensions();
            (w, h, img.into_raw())
        }
        None => (cli.width, cli.height, test_card(cli.width, cli.height)),
    };
    premultiply_in_place(&mut content);

    let config = WaveConfig {
        width,
        height,
        amplitude: cli.amplitude,
        wavelength: cli.wavelength,
        step: cli.speed,
    };
    let mut anim = WaveAnimator::new(config, FrameLoop::default())?;
    if cli.indeterminate {
        anim.set_indeterminate(true);
    }
    anim.start();

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir '{}'", cli.out_dir.display()))?;

    let mut out = vec![0u8; content.len()];
    for frame in 0..cli.frames {
        if anim.scheduler_mut().timeline.is_some() {
            let elapsed = Duration::from_secs_f64(f64::from(frame) / cli.fps);
            anim.on_timeline(elapsed);
        } else {
            let sweep = if cli.frames > 1 {
                frame as f32 / (cli.frames - 1) as f32
            } else {
                1.0
            };
            anim.set_progress(sweep);
        }
        if anim.scheduler_mut().ticking {
            anim.on_tick();
        }

        anim.render(&content, &mut out)?;

        let mut straight = out.clone();
        unpremultiply_in_place(&mut straight);
        let img = image::RgbaImage::from_raw(width, height, straight)
            .context("frame buffer does not match surface dimensions")?;
        let path = cli.out_dir.join(format!("frame_{frame:04}.png"));
        img.save(&path)
            .with_context(|| format!("write '{}'", path.display()))?;
    }

    anim.stop();
    println!(
        "wrote {} frames ({}x{}) to {} ({} redraw requests)",
        cli.frames,
        width,
        height,
        cli.out_dir.display(),
        anim.scheduler_mut().redraws
    );
    Ok(())
}

/// Straight-alpha RGBA8 test card: a warm disc over a cool gradient, enough
/// color for the gray/color split to be obvious.
fn test_card(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity((width * height * 4) as usize);
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let radius = f64::from(width.min(height)) * 0.35;

    for y in 0..height {
        for x in 0..width {
            let dx = f64::from(x) - cx;
            let dy = f64::from(y) - cy;
            let inside = (dx * dx + dy * dy).sqrt() < radius;
            if inside {
                buf.extend_from_slice(&[235, 130, 40, 255]);
            } else {
                let t = f64::from(y) / f64::from(height.max(1));
                let g = 60.0 + 120.0 * t;
                buf.extend_from_slice(&[30, g as u8, 180, 255]);
            }
        }
    }
    buf
}
