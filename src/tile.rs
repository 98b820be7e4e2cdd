use crate::error::{WavefillError, WavefillResult};

/// One rasterized period-run of the wave boundary, kept as an alpha-only
/// stencil. The buffer spans enough whole wavelengths to cover the target
/// width plus one extra period, so a copy translated by any offset in
/// `[0, wavelength)` never exposes an unrendered edge.
///
/// Immutable once built; the animator replaces it wholesale when amplitude
/// or wavelength change.
#[derive(Clone, Debug)]
pub struct WaveTile {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl WaveTile {
    /// Rasterize a tile for a surface `tile_width` wide with the given
    /// `wavelength` and `amplitude` (both in pixels). The result is
    /// `wavelength * repeat` wide and `2 * amplitude` tall, filled below the
    /// wave boundary.
    ///
    /// `amplitude == 0` yields a flat, zero-height tile without touching the
    /// rasterizer.
    #[tracing::instrument]
    pub fn build(tile_width: u32, wavelength: u32, amplitude: u32) -> WavefillResult<Self> {
        if tile_width == 0 {
            return Err(WavefillError::validation("tile width must be > 0"));
        }
        if wavelength < 8 {
            return Err(WavefillError::validation("wavelength must be >= 8"));
        }

        let repeat = (tile_width + wavelength).div_ceil(wavelength);
        let width = wavelength * repeat;
        let height = 2 * amplitude;

        if amplitude == 0 {
            return Ok(Self {
                width,
                height: 0,
                alpha: Vec::new(),
            });
        }

        let width_u16: u16 = width
            .try_into()
            .map_err(|_| WavefillError::surface("tile width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| WavefillError::surface("tile height exceeds u16"))?;

        let path = wave_path(repeat, wavelength, amplitude);

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_path(&bezpath_to_cpu(&path));
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);

        let alpha = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at a pixel. Callers keep `x`/`y` in bounds; the render path
    /// wraps `x` modulo the tile width before sampling.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.alpha[y as usize * self.width as usize + x as usize]
    }

    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height);
        let start = y as usize * self.width as usize;
        &self.alpha[start..start + self.width as usize]
    }
}

/// The closed wave boundary: from the left midline, alternate quadratic
/// segments toward crest and trough at quarter-wavelength steps, two
/// segments per period, then down around the bottom corners. Filling it
/// yields the region below the boundary.
pub fn wave_path(repeat: u32, wavelength: u32, amplitude: u32) -> kurbo::BezPath {
    let amplitude = f64::from(amplitude);
    let width = f64::from(wavelength * repeat);
    let bottom = amplitude * 2.0;
    let step_x = f64::from(wavelength) / 4.0;

    let mut path = kurbo::BezPath::new();
    path.move_to((0.0, amplitude));

    let mut x = 0.0;
    let mut y = 0.0;
    for _ in 0..repeat * 2 {
        x += step_x;
        path.quad_to((x, y), (x + step_x, amplitude));
        x += step_x;
        y = bottom - y;
    }

    path.line_to((width, bottom));
    path.line_to((0.0, bottom));
    path.close_path();
    path
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
