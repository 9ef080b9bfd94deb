use image::RgbImage;
use rayon::prelude::*;

use super::{reflect101, saturate_u8};

/// Separable 3x3 Gaussian kernel (sigma ~0.8)
const KERNEL: [f32; 3] = [0.25, 0.5, 0.25];

/// 3x3 Gaussian blur with reflect-101 borders, rounded back to 8 bits
pub fn gaussian_blur_3x3(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }

    let src = image.as_raw();
    let stride = w * 3;

    // horizontal pass into f32
    let mut horizontal = vec![0f32; stride * h];
    horizontal
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * stride..(y + 1) * stride];
            for x in 0..w {
                let left = reflect101(x as i64 - 1, w as i64) * 3;
                let right = reflect101(x as i64 + 1, w as i64) * 3;
                for c in 0..3 {
                    row[x * 3 + c] = KERNEL[0] * src_row[left + c] as f32
                        + KERNEL[1] * src_row[x * 3 + c] as f32
                        + KERNEL[2] * src_row[right + c] as f32;
                }
            }
        });

    // vertical pass
    let mut out = RgbImage::new(width, height);
    out.par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let up = reflect101(y as i64 - 1, h as i64) * stride;
            let down = reflect101(y as i64 + 1, h as i64) * stride;
            let mid = y * stride;
            for (i, px) in row.iter_mut().enumerate() {
                *px = saturate_u8(
                    KERNEL[0] * horizontal[up + i]
                        + KERNEL[1] * horizontal[mid + i]
                        + KERNEL[2] * horizontal[down + i],
                );
            }
        });

    out
}
