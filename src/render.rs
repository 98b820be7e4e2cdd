use crate::{
    composite,
    error::{WavefillError, WavefillResult},
    tile::WaveTile,
};

/// Progress this close to either end skips the wave drawing entirely:
/// below it nothing is filled, above `1 - PROGRESS_EPSILON` everything is.
pub const PROGRESS_EPSILON: f32 = 0.001;

/// Everything `compose` needs for one frame: the animator's current state
/// plus the tile to stencil with.
#[derive(Clone, Copy, Debug)]
pub struct OverlayPass<'a> {
    pub width: u32,
    pub height: u32,
    pub water_level: i32,
    pub offset: u32,
    pub progress: f32,
    pub tile: &'a WaveTile,
}

/// Composite one frame of the overlay.
///
/// The unfilled region shows `content` desaturated; rows below the wave
/// band show it in full color; across the band the color copy is blended
/// over the gray one through the tile's alpha, sampled at
/// `(x + offset) mod tile_width`. Both buffers are premultiplied RGBA8 of
/// `width × height`.
pub fn compose(pass: &OverlayPass<'_>, content: &[u8], out: &mut [u8]) -> WavefillResult<()> {
    let expected = pass.width as usize * pass.height as usize * 4;
    if content.len() != expected || out.len() != expected {
        return Err(WavefillError::validation(
            "compose expects width*height premultiplied rgba8 buffers",
        ));
    }

    composite::grayscale_into(out, content)?;

    if pass.progress <= PROGRESS_EPSILON {
        return Ok(());
    }

    let height = i64::from(pass.height);
    let row_bytes = pass.width as usize * 4;
    let level = i64::from(pass.water_level);
    let band_end = level + i64::from(pass.tile.height());
    let fully_filled = pass.progress >= 1.0 - PROGRESS_EPSILON;

    // Full color below the band; when fully filled the band is skipped and
    // color starts at the level itself.
    let color_from = if fully_filled { level } else { band_end };
    for y in color_from.clamp(0, height)..height {
        let start = y as usize * row_bytes;
        out[start..start + row_bytes].copy_from_slice(&content[start..start + row_bytes]);
    }

    if fully_filled {
        return Ok(());
    }

    for y in level.clamp(0, height)..band_end.clamp(0, height) {
        let tile_row = (y - level) as u32;
        let start = y as usize * row_bytes;
        composite::stencil_over_row(
            &mut out[start..start + row_bytes],
            &content[start..start + row_bytes],
            pass.tile.row(tile_row),
            pass.offset,
        )?;
    }

    Ok(())
}
