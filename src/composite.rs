use crate::error::{WavefillError, WavefillResult};

pub type PremulRgba8 = [u8; 4];

/// The fixed desaturation matrix applied to the unfilled region, scaled by
/// 1000. The weights deliberately sum below unity so the gray portion also
/// reads slightly dimmed.
const GRAY_WEIGHTS: [u32; 3] = [264, 472, 88];

pub fn gray(px: PremulRgba8) -> PremulRgba8 {
    let [r, g, b, a] = px;
    let luma = (u32::from(r) * GRAY_WEIGHTS[0]
        + u32::from(g) * GRAY_WEIGHTS[1]
        + u32::from(b) * GRAY_WEIGHTS[2]
        + 500)
        / 1000;
    let luma = luma.min(255) as u8;
    [luma, luma, luma, a]
}

/// Composite `src` over `dst` through a stencil coverage value: `src` is
/// first cut to the stencil (destination-in), then placed over `dst`. With
/// full coverage this replaces opaque pixels; with zero coverage it is a
/// no-op.
pub fn masked_over(dst: PremulRgba8, src: PremulRgba8, coverage: u8) -> PremulRgba8 {
    if coverage == 0 || src[3] == 0 {
        return dst;
    }

    let cov = u16::from(coverage);
    let sa = mul_div255(u16::from(src[3]), cov);
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), cov);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Write a desaturated copy of `src` into `dst`.
pub fn grayscale_into(dst: &mut [u8], src: &[u8]) -> WavefillResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WavefillError::validation(
            "grayscale_into expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        d.copy_from_slice(&gray([s[0], s[1], s[2], s[3]]));
    }
    Ok(())
}

/// Blend one row of `src` over `dst` through a stencil row, sampling the
/// stencil at `(x + offset) mod stencil.len()`.
pub fn stencil_over_row(
    dst: &mut [u8],
    src: &[u8],
    stencil: &[u8],
    offset: u32,
) -> WavefillResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WavefillError::validation(
            "stencil_over_row expects equal-length rgba8 rows",
        ));
    }
    if stencil.is_empty() {
        return Err(WavefillError::validation("stencil row must be non-empty"));
    }

    let period = stencil.len() as u64;
    for (x, (d, s)) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)).enumerate() {
        let sx = ((x as u64 + u64::from(offset)) % period) as usize;
        let out = masked_over(
            [d[0], d[1], d[2], d[3]],
            [s[0], s[1], s[2], s[3]],
            stencil[sx],
        );
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Straight RGBA8 to premultiplied, in place.
pub fn premultiply_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in px.iter_mut().take(3) {
            *c = mul_div255(u16::from(*c), a);
        }
    }
}

/// Premultiplied RGBA8 back to straight, in place. Fully transparent pixels
/// stay zeroed.
pub fn unpremultiply_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in px.iter_mut().take(3) {
            let v = (u32::from(*c) * 255 + u32::from(a) / 2) / u32::from(a);
            *c = v.min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_preserves_alpha_and_flattens_channels() {
        let out = gray([100, 150, 200, 210]);
        assert_eq!(out[3], 210);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn gray_weights_dim_pure_white() {
        // 0.264 + 0.472 + 0.088 = 0.824, so white lands near 210.
        let out = gray([255, 255, 255, 255]);
        assert_eq!(out[0], 210);
    }

    #[test]
    fn masked_over_zero_coverage_is_noop() {
        let dst = [10, 20, 30, 255];
        assert_eq!(masked_over(dst, [200, 200, 200, 255], 0), dst);
    }

    #[test]
    fn masked_over_full_coverage_replaces_opaque() {
        let src = [200, 100, 50, 255];
        assert_eq!(masked_over([10, 20, 30, 255], src, 255), src);
    }

    #[test]
    fn masked_over_transparent_src_is_noop() {
        let dst = [10, 20, 30, 255];
        assert_eq!(masked_over(dst, [0, 0, 0, 0], 255), dst);
    }

    #[test]
    fn masked_over_half_coverage_mixes() {
        let out = masked_over([0, 0, 0, 255], [255, 255, 255, 255], 128);
        assert!(out[0] > 120 && out[0] < 136);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn grayscale_into_rejects_mismatched_lengths() {
        let mut dst = [0u8; 8];
        let src = [0u8; 4];
        assert!(grayscale_into(&mut dst, &src).is_err());
    }

    #[test]
    fn stencil_row_wraps_sampling() {
        // Stencil keeps even columns only; offset 1 flips the parity.
        let src = [255u8, 0, 0, 255, 255, 0, 0, 255];
        let mut dst = [0u8, 0, 0, 255, 0, 0, 0, 255];
        let stencil = [255u8, 0];
        stencil_over_row(&mut dst, &src, &stencil, 1).unwrap();
        assert_eq!(&dst[..4], &[0, 0, 0, 255]);
        assert_eq!(&dst[4..], &[255, 0, 0, 255]);
    }

    #[test]
    fn premultiply_roundtrip_is_stable_for_opaque() {
        let mut buf = [12u8, 34, 56, 255, 200, 100, 0, 255];
        let orig = buf;
        premultiply_in_place(&mut buf);
        unpremultiply_in_place(&mut buf);
        assert_eq!(buf, orig);
    }

    #[test]
    fn unpremultiply_zero_alpha_clears_color() {
        let mut buf = [12u8, 34, 56, 0];
        unpremultiply_in_place(&mut buf);
        assert_eq!(buf, [0, 0, 0, 0]);
    }
}
