//! Floyd-Steinberg error diffusion over 8-bit RGB.
//!
//! ```text
//!        X   7
//!    3   5   1
//! ```
//!
//! Rows are scanned left to right. Error is carried in `i32` and the
//! corrected pixel is clamped to `0..=255` before matching.

use crate::color::Rgb;
use crate::palette::Palette;

/// (dx, dy, weight) entries, divisor 16.
const FLOYD_STEINBERG: [(isize, usize, i32); 4] = [(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)];
const DIVISOR: i32 = 16;

/// Map every pixel to a palette index while diffusing the matching error.
///
/// `pixels` must hold `width * height` entries; the caller validates this.
pub(crate) fn floyd_steinberg(
    pixels: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
) -> Vec<u8> {
    let mut indices = Vec::with_capacity(pixels.len());
    // Two rolling rows of accumulated error
    let mut current = vec![[0i32; 3]; width];
    let mut next = vec![[0i32; 3]; width];

    for y in 0..height {
        for x in 0..width {
            let src = pixels[y * width + x];
            let err = current[x];
            let corrected = Rgb::new(
                clamp_channel(src.r as i32 + err[0]),
                clamp_channel(src.g as i32 + err[1]),
                clamp_channel(src.b as i32 + err[2]),
            );

            let idx = palette.find_nearest(corrected);
            indices.push(idx as u8);

            let chosen = palette.color(idx);
            let delta = [
                corrected.r as i32 - chosen.r as i32,
                corrected.g as i32 - chosen.g as i32,
                corrected.b as i32 - chosen.b as i32,
            ];
            if delta == [0, 0, 0] {
                continue;
            }

            let shares = delta.map(error_shares);
            for (k, &(dx, dy, _)) in FLOYD_STEINBERG.iter().enumerate() {
                let nx = x as isize + dx;
                if nx < 0 || nx as usize >= width || y + dy >= height {
                    continue;
                }
                let row = if dy == 0 { &mut current } else { &mut next };
                let cell = &mut row[nx as usize];
                for c in 0..3 {
                    cell[c] += shares[c][k];
                }
            }
        }

        std::mem::swap(&mut current, &mut next);
        next.iter_mut().for_each(|e| *e = [0; 3]);
    }

    indices
}

/// Split `delta` over the kernel entries by cumulative weight, so the
/// shares add up to `delta` exactly and no error is lost to truncation.
fn error_shares(delta: i32) -> [i32; 4] {
    let mut shares = [0; 4];
    let mut cumulative = 0;
    let mut handed_out = 0;
    for (share, &(_, _, weight)) in shares.iter_mut().zip(&FLOYD_STEINBERG) {
        cumulative += weight;
        let upto = delta * cumulative / DIVISOR;
        *share = upto - handed_out;
        handed_out = upto;
    }
    shares
}

#[inline]
fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn black_white() -> Palette {
        Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap()
    }

    #[test]
    fn test_mid_grey_mixes_black_and_white() {
        let palette = black_white();
        let pixels = vec![Rgb::new(128, 128, 128); 16];
        let result = floyd_steinberg(&pixels, 4, 4, &palette);

        let white = result.iter().filter(|&&i| i == 1).count();
        assert!(white > 4 && white < 12, "white count {}", white);
    }

    #[test]
    fn test_dark_grey_brightness_preserved() {
        let palette = black_white();
        let (width, height) = (10, 10);
        let pixels = vec![Rgb::new(77, 77, 77); width * height];
        let result = floyd_steinberg(&pixels, width, height, &palette);

        let white_ratio =
            result.iter().filter(|&&i| i == 1).count() as f32 / (width * height) as f32;
        // 77/255 ~ 0.30
        assert!((white_ratio - 0.30).abs() < 0.15, "ratio {}", white_ratio);
    }

    #[test]
    fn test_error_shares_sum_to_error() {
        for delta in -255..=255 {
            let shares = error_shares(delta);
            assert_eq!(shares.iter().sum::<i32>(), delta, "delta {delta}");
            assert!(shares.iter().all(|s| s.signum() * delta.signum() >= 0));
        }
        // 7 + 3 + 5 + 1 of 16
        assert_eq!(error_shares(16), [7, 3, 5, 1]);
        // Plain truncation would hand out 0 + 0 + 0 + 0
        assert_eq!(error_shares(3), [1, 0, 1, 1]);
    }

    #[test]
    fn test_exact_colors_untouched() {
        let palette = black_white();
        let pixels = vec![Rgb::BLACK, Rgb::WHITE, Rgb::WHITE, Rgb::BLACK];
        assert_eq!(floyd_steinberg(&pixels, 2, 2, &palette), vec![0, 1, 1, 0]);
    }
}
