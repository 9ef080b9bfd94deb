//! Contrast-limited adaptive histogram equalization
//!
//! The plane is divided into a grid of tiles. Each tile gets its own
//! equalization table, computed from a histogram whose bins are clipped at a
//! limit proportional to the tile area; the clipped excess is spread back over
//! all bins. Output pixels blend the tables of the four nearest tile centres.

use image::GrayImage;
use rayon::prelude::*;

use super::{reflect101, saturate_u8};

const HIST_SIZE: usize = 256;

/// CLAHE operator with a fixed clip limit and a square tile grid
#[derive(Debug, Clone, Copy)]
pub struct Clahe {
    clip_limit: f32,
    tiles: u32,
}

impl Clahe {
    /// Create an operator. `tiles` is the number of tiles per side; values
    /// below 1 are treated as 1.
    pub fn new(clip_limit: f32, tiles: u32) -> Self {
        Self {
            clip_limit,
            tiles: tiles.max(1),
        }
    }

    pub fn apply(&self, src: &GrayImage) -> GrayImage {
        let (width, height) = src.dimensions();
        if width == 0 || height == 0 {
            return src.clone();
        }

        let tiles = self.tiles;
        let grid = TileGrid::new(width, height, tiles);
        let luts = self.tile_luts(src, &grid);

        let inv_tw = 1.0 / grid.tile_width as f32;
        let inv_th = 1.0 / grid.tile_height as f32;
        let last_tile = tiles as i64 - 1;

        let columns: Vec<Blend> = (0..width)
            .map(|x| Blend::new(x as f32 * inv_tw - 0.5, last_tile))
            .collect();

        let mut out = GrayImage::new(width, height);
        let src_raw = src.as_raw();

        out.par_chunks_exact_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let rows = Blend::new(y as f32 * inv_th - 0.5, last_tile);
                let top = rows.lo * tiles as usize;
                let bottom = rows.hi * tiles as usize;
                let src_row = &src_raw[y * width as usize..(y + 1) * width as usize];

                for (x, out_px) in row.iter_mut().enumerate() {
                    let col = &columns[x];
                    let v = src_row[x] as usize;

                    let upper = luts[top + col.lo][v] as f32 * col.weight_lo
                        + luts[top + col.hi][v] as f32 * col.weight_hi;
                    let lower = luts[bottom + col.lo][v] as f32 * col.weight_lo
                        + luts[bottom + col.hi][v] as f32 * col.weight_hi;

                    *out_px = saturate_u8(upper * rows.weight_lo + lower * rows.weight_hi);
                }
            });

        out
    }

    /// One lookup table per tile, row-major over the grid
    fn tile_luts(&self, src: &GrayImage, grid: &TileGrid) -> Vec<[u8; HIST_SIZE]> {
        let tile_area = grid.tile_width as usize * grid.tile_height as usize;
        let clip = ((self.clip_limit as f64 * tile_area as f64 / HIST_SIZE as f64) as u32).max(1);
        let lut_scale = 255.0 / tile_area as f32;

        let (width, height) = src.dimensions();
        let raw = src.as_raw();
        let tiles = grid.tiles;

        (0..tiles * tiles)
            .into_par_iter()
            .map(|index| {
                let tx = index % tiles;
                let ty = index / tiles;
                let mut hist = [0u32; HIST_SIZE];

                for ey in ty * grid.tile_height..(ty + 1) * grid.tile_height {
                    let sy = reflect101(ey as i64, height as i64);
                    for ex in tx * grid.tile_width..(tx + 1) * grid.tile_width {
                        let sx = reflect101(ex as i64, width as i64);
                        hist[raw[sy * width as usize + sx] as usize] += 1;
                    }
                }

                clip_histogram(&mut hist, clip);

                let mut lut = [0u8; HIST_SIZE];
                let mut sum = 0u32;
                for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
                    sum += count;
                    *entry = saturate_u8(sum as f32 * lut_scale);
                }
                lut
            })
            .collect()
    }
}

/// Clip every bin at `limit` and redistribute the excess: an equal share to
/// every bin, then the remainder one count at a time in equal strides.
fn clip_histogram(hist: &mut [u32; HIST_SIZE], limit: u32) {
    let mut clipped = 0u32;
    for count in hist.iter_mut() {
        if *count > limit {
            clipped += *count - limit;
            *count = limit;
        }
    }

    let batch = clipped / HIST_SIZE as u32;
    let mut residual = clipped - batch * HIST_SIZE as u32;

    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (HIST_SIZE / residual as usize).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            i += step;
            residual -= 1;
        }
    }
}

/// Tile layout over the (possibly padded) plane.
///
/// Planes whose sides are not both multiples of the grid are extended by
/// reflection to `side + tiles - side % tiles` along each axis.
struct TileGrid {
    tiles: u32,
    tile_width: u32,
    tile_height: u32,
}

impl TileGrid {
    fn new(width: u32, height: u32, tiles: u32) -> Self {
        let (ext_width, ext_height) = if width % tiles == 0 && height % tiles == 0 {
            (width, height)
        } else {
            (width + tiles - width % tiles, height + tiles - height % tiles)
        };

        Self {
            tiles,
            tile_width: ext_width / tiles,
            tile_height: ext_height / tiles,
        }
    }
}

/// Neighbouring tile indices and bilinear weights along one axis
struct Blend {
    lo: usize,
    hi: usize,
    weight_lo: f32,
    weight_hi: f32,
}

impl Blend {
    fn new(position: f32, last_tile: i64) -> Self {
        let floor = position.floor();
        let lo = floor as i64;
        let weight_hi = position - floor;

        Self {
            lo: lo.clamp(0, last_tile) as usize,
            hi: (lo + 1).clamp(0, last_tile) as usize,
            weight_lo: 1.0 - weight_hi,
            weight_hi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(plane: &GrayImage) -> (u8, u8) {
        let min = plane.as_raw().iter().copied().min().unwrap_or(0);
        let max = plane.as_raw().iter().copied().max().unwrap_or(0);
        (min, max)
    }

    #[test]
    fn test_preserves_dimensions() {
        for (w, h) in [(1, 1), (3, 3), (7, 13), (16, 16), (64, 40)] {
            let plane = GrayImage::from_fn(w, h, |x, y| image::Luma([((x * 7 + y * 3) % 256) as u8]));
            let out = Clahe::new(1.2, 8).apply(&plane);
            assert_eq!(out.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_expands_low_contrast_gradient() {
        let plane = GrayImage::from_fn(64, 64, |x, _| image::Luma([100 + (x / 2) as u8]));
        let (in_min, in_max) = range(&plane);
        let (out_min, out_max) = range(&Clahe::new(2.0, 8).apply(&plane));
        assert!(out_max - out_min > in_max - in_min);
    }

    #[test]
    fn test_tiny_constant_plane_saturates() {
        // 1x1 tiles: every tile LUT jumps straight to 255 at the plane value
        let plane = GrayImage::from_pixel(3, 3, image::Luma([110]));
        let out = Clahe::new(1.2, 8).apply(&plane);
        assert!(out.as_raw().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_is_deterministic() {
        let plane = GrayImage::from_fn(50, 37, |x, y| image::Luma([((x * x + y * 5) % 256) as u8]));
        let clahe = Clahe::new(1.2, 8);
        assert_eq!(clahe.apply(&plane), clahe.apply(&plane));
    }

    #[test]
    fn test_clip_histogram_redistributes_everything() {
        let mut hist = [0u32; HIST_SIZE];
        hist[10] = 1000;
        hist[20] = 3;
        clip_histogram(&mut hist, 4);
        assert_eq!(hist.iter().sum::<u32>(), 1003);
        assert!(hist.iter().all(|&c| c <= 4 + 996 / 256 + 1));
    }
}
