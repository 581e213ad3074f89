use std::f32::consts::PI;

/// Mono sine tone of `block` samples.
pub fn mono_sine(freq_hz: f32, sample_rate: u32, block: usize, amplitude: f32) -> Vec<f32> {
    (0..block)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Interleaved stereo frame carrying the same tone on both channels.
pub fn stereo_sine(freq_hz: f32, sample_rate: u32, block: usize, amplitude: f32) -> Vec<f32> {
    let mono = mono_sine(freq_hz, sample_rate, block, amplitude);
    let mut frame = Vec::with_capacity(block * 2);
    for s in mono {
        frame.push(s);
        frame.push(s);
    }
    frame
}

/// Index of the largest value in a slice.
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
