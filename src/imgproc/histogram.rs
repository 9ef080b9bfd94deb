//! Histograms, global equalization and percentiles over 8-bit planes

use super::saturate_u8;

/// 256-bin histogram of 8-bit values
pub fn histogram(values: &[u8]) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in values {
        hist[v as usize] += 1;
    }
    hist
}

/// Build the global equalization lookup table for a histogram.
///
/// The lowest occupied bin maps to 0 and the cumulative distribution above it
/// is stretched to 255. A histogram with a single occupied bin (a constant
/// plane) yields the identity table.
pub fn equalize_lut(hist: &[u32; 256]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    let total: u32 = hist.iter().sum();

    let Some(first) = hist.iter().position(|&count| count > 0) else {
        return lut;
    };

    if hist[first] == total {
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }

    let scale = 255.0 / (total - hist[first]) as f32;
    let mut sum = 0u32;
    for i in first + 1..256 {
        sum += hist[i];
        lut[i] = saturate_u8(sum as f32 * scale);
    }

    lut
}

/// The `p`-th percentile (0-100) of the values counted in `hist`, linearly
/// interpolated between the two nearest ranks. Returns 0 for an empty histogram.
pub fn percentile(hist: &[u32; 256], p: f64) -> f32 {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0.0;
    }

    let position = (p.clamp(0.0, 100.0) / 100.0) * (total - 1) as f64;
    let lower_rank = position.floor() as u64;
    let upper_rank = (lower_rank + 1).min(total - 1);
    let fraction = position - lower_rank as f64;

    let lower = value_at_rank(hist, lower_rank) as f64;
    let upper = value_at_rank(hist, upper_rank) as f64;

    (lower + (upper - lower) * fraction) as f32
}

/// Value of the element at `rank` (0-based) in the sorted data
fn value_at_rank(hist: &[u32; 256], rank: u64) -> u8 {
    let mut seen = 0u64;
    for (value, &count) in hist.iter().enumerate() {
        seen += count as u64;
        if seen > rank {
            return value as u8;
        }
    }
    255
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts() {
        let hist = histogram(&[0, 0, 5, 255]);
        assert_eq!(hist[0], 2);
        assert_eq!(hist[5], 1);
        assert_eq!(hist[255], 1);
        assert_eq!(hist.iter().sum::<u32>(), 4);
    }

    #[test]
    fn test_equalize_lut_stretches_to_full_range() {
        let lut = equalize_lut(&histogram(&[100, 110, 120, 130]));
        let mapped: Vec<u8> = [100, 110, 120, 130].iter().map(|&v| lut[v as usize]).collect();
        assert_eq!(mapped, vec![0, 85, 170, 255]);
    }

    #[test]
    fn test_equalize_lut_of_constant_plane_is_identity() {
        let lut = equalize_lut(&histogram(&[77; 9]));
        assert!((0..=255u8).all(|v| lut[v as usize] == v));
    }

    #[test]
    fn test_percentile_interpolates() {
        // 0..=99 -> 95th percentile at position 94.05
        let values: Vec<u8> = (0..100).collect();
        let hist = histogram(&values);
        assert!((percentile(&hist, 95.0) - 94.05).abs() < 1e-4);
        assert_eq!(percentile(&hist, 0.0), 0.0);
        assert_eq!(percentile(&hist, 100.0), 99.0);
    }

    #[test]
    fn test_percentile_of_constant_and_empty() {
        let hist = histogram(&[42; 9]);
        assert_eq!(percentile(&hist, 95.0), 42.0);
        assert_eq!(percentile(&[0u32; 256], 95.0), 0.0);
    }
}
