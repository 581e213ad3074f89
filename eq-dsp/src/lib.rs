use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DspError {
    #[error("expected a frame of {expected} interleaved samples ({channels} channels), got {got}")]
    FrameLength {
        expected: usize,
        channels: usize,
        got: usize,
    },
    #[error("expected a mono block of {expected} samples, got {got}")]
    BlockLength { expected: usize, got: usize },
}

/// Average all channels per sample position into a mono block.
///
/// The frame must hold exactly `block_size * channels` interleaved samples;
/// anything else is a caller contract violation.
pub fn downmix(frame: &[f32], channels: usize, block_size: usize) -> Result<Vec<f32>, DspError> {
    let expected = block_size * channels;
    if channels == 0 || frame.len() != expected {
        return Err(DspError::FrameLength {
            expected,
            channels,
            got: frame.len(),
        });
    }
    if channels == 1 {
        return Ok(frame.to_vec());
    }
    Ok(frame
        .chunks_exact(channels)
        .map(|pos| pos.iter().sum::<f32>() / channels as f32)
        .collect())
}

/// FFT front end of the pipeline: downmix -> optional high-pass -> magnitude
/// spectrum. Plans and scratch buffers are allocated once so per-frame work
/// is allocation-free apart from the returned vectors.
pub struct SpectralAnalyzer {
    block_size: usize,
    sample_rate: u32,
    highpass_cutoff: Option<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    buf: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl SpectralAnalyzer {
    pub fn new(block_size: usize, sample_rate: u32, highpass_cutoff: Option<f32>) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(block_size);
        let inverse = planner.plan_fft_inverse(block_size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Self {
            block_size,
            sample_rate,
            highpass_cutoff,
            forward,
            inverse,
            buf: vec![Complex32::new(0.0, 0.0); block_size],
            scratch: vec![Complex32::new(0.0, 0.0); scratch_len],
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of real-FFT bins: block_size / 2 + 1.
    pub fn spectrum_len(&self) -> usize {
        self.block_size / 2 + 1
    }

    /// Width of one FFT bin in Hz.
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate as f32 / self.block_size as f32
    }

    /// Unnormalized magnitude spectrum of a mono block.
    pub fn magnitude_spectrum(&mut self, mono: &[f32]) -> Result<Vec<f32>, DspError> {
        self.load(mono)?;
        self.forward
            .process_with_scratch(&mut self.buf, &mut self.scratch);
        Ok(self.buf[..self.spectrum_len()]
            .iter()
            .map(|c| c.norm())
            .collect())
    }

    /// Zero all frequency content below `cutoff_hz` and transform back to the
    /// time domain. Removes DC offset and rumble; output length equals input
    /// length.
    pub fn high_pass(&mut self, mono: &[f32], cutoff_hz: f32) -> Result<Vec<f32>, DspError> {
        self.load(mono)?;
        self.forward
            .process_with_scratch(&mut self.buf, &mut self.scratch);

        let n = self.block_size;
        let bin_hz = self.bin_hz();
        for k in 0..=n / 2 {
            if k as f32 * bin_hz >= cutoff_hz {
                break;
            }
            self.buf[k] = Complex32::new(0.0, 0.0);
            // Mirror bin keeps the spectrum conjugate-symmetric so the
            // inverse transform stays real.
            if k > 0 {
                self.buf[n - k] = Complex32::new(0.0, 0.0);
            }
        }

        self.inverse
            .process_with_scratch(&mut self.buf, &mut self.scratch);
        // rustfft leaves the 1/N scale to the caller.
        let scale = 1.0 / n as f32;
        Ok(self.buf.iter().map(|c| c.re * scale).collect())
    }

    /// Full front half: interleaved frame -> magnitude spectrum, applying the
    /// configured high-pass stage when one is set.
    pub fn process_frame(&mut self, frame: &[f32], channels: usize) -> Result<Vec<f32>, DspError> {
        let mono = downmix(frame, channels, self.block_size)?;
        let mono = match self.highpass_cutoff {
            Some(cutoff) => self.high_pass(&mono, cutoff)?,
            None => mono,
        };
        self.magnitude_spectrum(&mono)
    }

    fn load(&mut self, mono: &[f32]) -> Result<(), DspError> {
        if mono.len() != self.block_size {
            return Err(DspError::BlockLength {
                expected: self.block_size,
                got: mono.len(),
            });
        }
        for (slot, &s) in self.buf.iter_mut().zip(mono) {
            *slot = Complex32::new(s, 0.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn downmix_averages_stereo_pairs() {
        let frame = [1.0, 3.0, -1.0, 1.0, 0.5, 0.5];
        let mono = downmix(&frame, 2, 3).unwrap();
        assert_eq!(mono, vec![2.0, 0.0, 0.5]);
    }

    #[test]
    fn downmix_mono_is_a_no_op() {
        let frame = [0.25, -0.5, 1.0];
        assert_eq!(downmix(&frame, 1, 3).unwrap(), frame.to_vec());
    }

    #[test]
    fn downmix_rejects_wrong_length() {
        let frame = [0.0; 7];
        assert!(matches!(
            downmix(&frame, 2, 4),
            Err(DspError::FrameLength { expected: 8, got: 7, .. })
        ));
    }

    #[test]
    fn dc_block_concentrates_in_bin_zero() {
        let mut analyzer = SpectralAnalyzer::new(64, 48_000, None);
        let mono = vec![1.0; 64];
        let spectrum = analyzer.magnitude_spectrum(&mono).unwrap();
        assert_eq!(spectrum.len(), 33);
        assert_abs_diff_eq!(spectrum[0], 64.0, epsilon = 1e-3);
        for &m in &spectrum[1..] {
            assert_abs_diff_eq!(m, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn high_pass_removes_dc_offset() {
        let mut analyzer = SpectralAnalyzer::new(256, 48_000, None);
        let mono = vec![0.7; 256];
        let filtered = analyzer.high_pass(&mono, 60.0).unwrap();
        assert_eq!(filtered.len(), 256);
        for &s in &filtered {
            assert_abs_diff_eq!(s, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn high_pass_keeps_content_above_cutoff() {
        let block = 1024;
        let sr = 48_000;
        let mut analyzer = SpectralAnalyzer::new(block, sr, None);
        // 1 kHz lands well above a 60 Hz cutoff.
        let mono: Vec<f32> = (0..block)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sr as f32).sin())
            .collect();
        let filtered = analyzer.high_pass(&mono, 60.0).unwrap();
        let before: f32 = mono.iter().map(|s| s * s).sum();
        let after: f32 = filtered.iter().map(|s| s * s).sum();
        assert_abs_diff_eq!(after / before, 1.0, epsilon = 0.05);
    }

    #[test]
    fn magnitude_spectrum_rejects_wrong_block() {
        let mut analyzer = SpectralAnalyzer::new(128, 48_000, None);
        assert!(matches!(
            analyzer.magnitude_spectrum(&[0.0; 64]),
            Err(DspError::BlockLength { expected: 128, got: 64 })
        ));
    }
}
