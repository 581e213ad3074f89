/// Groups contiguous FFT bins into the bands that drive the visual bars.
///
/// Boundaries are linearly interpolated over the bin range, so every band
/// covers (nearly) the same number of bins. The range table is computed once;
/// aggregation per frame is a mean over each precomputed slice.
pub struct BandAggregator {
    num_bins: usize,
    ranges: Vec<(usize, usize)>,
}

impl BandAggregator {
    /// Panics if either count is zero; those are construction-time contract
    /// violations, not runtime conditions.
    pub fn new(num_bins: usize, num_bands: usize) -> Self {
        assert!(num_bins > 0, "bin count must be greater than 0");
        assert!(num_bands > 0, "band count must be greater than 0");

        let mut ranges = Vec::with_capacity(num_bands);
        for i in 0..num_bands {
            let start = Self::boundary(i, num_bins, num_bands);
            let end = Self::boundary(i + 1, num_bins, num_bands);
            // With more bands than bins the interpolated range can collapse;
            // clamp every band to at least one in-range bin so the mean is
            // never taken over an empty slice.
            let start = start.min(num_bins - 1);
            let end = end.min(num_bins).max(start + 1);
            ranges.push((start, end));
        }

        Self { num_bins, ranges }
    }

    fn boundary(i: usize, num_bins: usize, num_bands: usize) -> usize {
        (i as f32 * num_bins as f32 / num_bands as f32).round() as usize
    }

    pub fn num_bands(&self) -> usize {
        self.ranges.len()
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn band_ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    /// Index of the band whose range contains `bin`, if any.
    pub fn band_for_bin(&self, bin: usize) -> Option<usize> {
        self.ranges
            .iter()
            .position(|&(start, end)| (start..end).contains(&bin))
    }

    /// Mean magnitude per band. `spectrum` must have `num_bins` entries.
    pub fn aggregate(&self, spectrum: &[f32]) -> Vec<f32> {
        debug_assert_eq!(spectrum.len(), self.num_bins);
        self.ranges
            .iter()
            .map(|&(start, end)| mean(&spectrum[start..end]))
            .collect()
    }
}

fn mean(slice: &[f32]) -> f32 {
    if slice.is_empty() {
        return 0.0;
    }
    slice.iter().sum::<f32>() / slice.len() as f32
}
