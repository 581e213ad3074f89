/// Exponential smoothing across successive band vectors.
///
/// `smoothed[i] = alpha * previous[i] + (1 - alpha) * raw[i]`. State is kept
/// in f32 the whole way; truncation to bar heights happens only in the
/// intensity mapper, so rounding error never compounds across frames.
pub struct TemporalSmoother {
    previous: Vec<f32>,
}

impl TemporalSmoother {
    /// State starts at all zeros, so the first frame fades in from silence.
    pub fn new(num_bands: usize) -> Self {
        Self {
            previous: vec![0.0; num_bands],
        }
    }

    pub fn num_bands(&self) -> usize {
        self.previous.len()
    }

    /// Blend `raw` into the held state and return the updated state.
    ///
    /// `alpha` = 0 passes the input straight through; `alpha` = 1 pins the
    /// output to whatever the state already holds.
    pub fn smooth(&mut self, raw: &[f32], alpha: f32) -> &[f32] {
        debug_assert_eq!(raw.len(), self.previous.len());
        let alpha = alpha.clamp(0.0, 1.0);
        for (prev, &r) in self.previous.iter_mut().zip(raw) {
            *prev = alpha * *prev + (1.0 - alpha) * r;
        }
        &self.previous
    }
}
