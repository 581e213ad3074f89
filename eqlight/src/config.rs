use anyhow::{ensure, Result};
use clap::Parser;

/// Live audio equalizer: vertical bars in the terminal plus an addressable
/// LED strip, driven by one FFT pass per capture frame.
#[derive(Parser, Debug)]
#[command(name = "eqlight", version)]
pub struct Cli {
    /// Input device index (see --list-devices); system default when omitted
    #[arg(long)]
    pub device: Option<usize>,

    /// Capture sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    /// Samples per frame (FFT size)
    #[arg(long, default_value_t = 1024)]
    pub block_size: usize,

    /// Capture channel count
    #[arg(long, default_value_t = 2)]
    pub channels: u16,

    /// Number of bars, and of LED pixels
    #[arg(long, default_value_t = 40)]
    pub bars: usize,

    /// Bar height in terminal rows
    #[arg(long, default_value_t = 20)]
    pub max_height: u16,

    /// Initial smoothing factor, 0.0..=1.0 (adjust live with + / -)
    #[arg(long, default_value_t = 0.8)]
    pub smoothing: f32,

    /// Enable the high-pass stage with this cutoff in Hz (60 removes
    /// DC offset and rumble at the reference configuration)
    #[arg(long, value_name = "HZ")]
    pub highpass: Option<f32>,

    /// Skip the LED strip output
    #[arg(long)]
    pub no_led: bool,

    /// List input devices and exit
    #[arg(long)]
    pub list_devices: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.block_size >= 2, "--block-size must be at least 2");
        ensure!(
            self.block_size % 2 == 0,
            "--block-size must be even (real FFT)"
        );
        ensure!(self.channels > 0, "--channels must be at least 1");
        ensure!(self.bars > 0, "--bars must be at least 1");
        ensure!(self.max_height > 0, "--max-height must be at least 1");
        ensure!(
            self.max_height <= 4096,
            "--max-height must be at most 4096"
        );
        ensure!(
            (0.0..=1.0).contains(&self.smoothing),
            "--smoothing must be within 0.0..=1.0"
        );
        ensure!(self.sample_rate > 0, "--sample-rate must be positive");
        if let Some(cutoff) = self.highpass {
            ensure!(
                cutoff > 0.0 && cutoff < self.sample_rate as f32 / 2.0,
                "--highpass must be between 0 and the Nyquist frequency"
            );
        }
        Ok(())
    }
}
