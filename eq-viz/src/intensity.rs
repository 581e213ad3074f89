use crate::color_strategy::{ColorContext, ColorStrategy};
use crate::types::{Rgb, VisualFrame};

/// Turns a smoothed band vector into bar heights and per-band colors.
///
/// Heights use log1p compression followed by per-frame max normalization:
/// the loudest band of every frame reaches `max_height`, everything else is
/// relative to it. Frame-relative scaling is the observed design; it is
/// scale-unstable across silence-to-loud transitions (see the saturation
/// test) and is kept as-is.
pub struct IntensityMapper {
    max_height: u16,
}

impl IntensityMapper {
    pub fn new(max_height: u16) -> Self {
        Self { max_height }
    }

    pub fn max_height(&self) -> u16 {
        self.max_height
    }

    /// Integer bar heights in `[0, max_height]`. An all-zero input maps to
    /// all-zero heights instead of dividing by zero.
    pub fn heights(&self, smoothed: &[f32]) -> Vec<u16> {
        let compressed: Vec<f32> = smoothed.iter().map(|&m| m.max(0.0).ln_1p()).collect();
        let max = compressed.iter().cloned().fold(0.0f32, f32::max);
        if max <= 0.0 {
            return vec![0; smoothed.len()];
        }
        compressed
            .iter()
            .map(|&v| ((v / max) * self.max_height as f32) as u16)
            .collect()
    }

    /// Heights plus one color per band from the given policy.
    pub fn map(&self, smoothed: &[f32], colors: &dyn ColorStrategy) -> VisualFrame {
        let heights = self.heights(smoothed);
        let num_bands = heights.len();
        let colors: Vec<Rgb> = heights
            .iter()
            .enumerate()
            .map(|(band_index, &height)| {
                colors.color(&ColorContext {
                    band_index,
                    num_bands,
                    row: height,
                    height,
                    max_height: self.max_height,
                })
            })
            .collect();
        VisualFrame { heights, colors }
    }
}
