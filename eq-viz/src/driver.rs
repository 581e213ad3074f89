use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use eq_dsp::SpectralAnalyzer;
use thiserror::Error;
use tracing::{error, warn};

use crate::band_aggregator::BandAggregator;
use crate::color_strategy::ColorStrategy;
use crate::intensity::IntensityMapper;
use crate::smoother::TemporalSmoother;
use crate::types::{Rgb, VisualFrame};

/// Adjustment applied per control event.
pub const SMOOTH_STEP: f32 = 0.05;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Backend(String),
}

/// Consumer of finished visual frames (the terminal display).
pub trait FrameSink {
    fn render(&mut self, frame: &VisualFrame, smoothing: f32) -> Result<(), SinkError>;
}

/// Addressable strip of RGB pixels. `show` flushes staged colors to the
/// device; `blank` is the mandatory shutdown state.
pub trait LedStrip {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn set(&mut self, index: usize, color: Rgb);
    fn show(&mut self) -> Result<(), SinkError>;
    fn blank(&mut self) -> Result<(), SinkError> {
        for i in 0..self.len() {
            self.set(i, Rgb::BLACK);
        }
        self.show()
    }
}

/// The shared smoothing factor: one f32 behind a single word, written by the
/// key listener and sampled once per frame. A frame seeing a one-event-stale
/// value is fine, so plain relaxed loads and stores are all that is needed.
pub struct SmoothingControl {
    bits: AtomicU32,
}

impl SmoothingControl {
    pub fn new(initial: f32) -> Self {
        Self {
            bits: AtomicU32::new(initial.clamp(0.0, 1.0).to_bits()),
        }
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Saturates at 1.0.
    pub fn raise(&self) -> f32 {
        self.step(SMOOTH_STEP)
    }

    /// Saturates at 0.0.
    pub fn lower(&self) -> f32 {
        self.step(-SMOOTH_STEP)
    }

    // Single writer, so a load-modify-store round trip cannot lose updates.
    fn step(&self, delta: f32) -> f32 {
        let next = (self.get() + delta).clamp(0.0, 1.0);
        self.bits.store(next.to_bits(), Ordering::Relaxed);
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Raise,
    Lower,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
}

/// Owns the per-frame loop: analyzer -> aggregator -> smoother -> mapper,
/// then independent dispatch to the text sink and the LED strip.
pub struct FrameScheduler {
    analyzer: SpectralAnalyzer,
    channels: usize,
    aggregator: BandAggregator,
    smoother: TemporalSmoother,
    mapper: IntensityMapper,
    led_colors: Box<dyn ColorStrategy + Send>,
    text: Box<dyn FrameSink + Send>,
    leds: Box<dyn LedStrip + Send>,
    smoothing: Arc<SmoothingControl>,
    state: DriverState,
}

impl FrameScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        analyzer: SpectralAnalyzer,
        channels: usize,
        bars: usize,
        max_height: u16,
        smoothing: Arc<SmoothingControl>,
        led_colors: Box<dyn ColorStrategy + Send>,
        text: Box<dyn FrameSink + Send>,
        leds: Box<dyn LedStrip + Send>,
    ) -> Self {
        let aggregator = BandAggregator::new(analyzer.spectrum_len(), bars);
        let smoother = TemporalSmoother::new(bars);
        let mapper = IntensityMapper::new(max_height);
        Self {
            analyzer,
            channels,
            aggregator,
            smoother,
            mapper,
            led_colors,
            text,
            leds,
            smoothing,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn smoothing(&self) -> &Arc<SmoothingControl> {
        &self.smoothing
    }

    pub fn start(&mut self) {
        if self.state == DriverState::Idle {
            self.state = DriverState::Running;
        }
    }

    /// One pipeline pass over a delivered frame. Frames arriving while not
    /// running are ignored. A malformed frame is a caller contract violation
    /// and stops the pipeline; a failing sink is logged and the other sink
    /// still gets the frame.
    pub fn process_frame(&mut self, frame: &[f32]) {
        if self.state != DriverState::Running {
            return;
        }
        let alpha = self.smoothing.get();

        let spectrum = match self.analyzer.process_frame(frame, self.channels) {
            Ok(spectrum) => spectrum,
            Err(e) => {
                error!("malformed capture frame: {e}");
                self.stop();
                return;
            }
        };
        let bands = self.aggregator.aggregate(&spectrum);
        let smoothed = self.smoother.smooth(&bands, alpha);
        let visual = self.mapper.map(smoothed, self.led_colors.as_ref());

        if let Err(e) = self.text.render(&visual, alpha) {
            warn!("text sink failed: {e}");
        }
        if let Err(e) = push_to_strip(self.leds.as_mut(), &visual) {
            warn!("led sink failed: {e}");
        }
    }

    pub fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Raise => {
                self.smoothing.raise();
            }
            ControlEvent::Lower => {
                self.smoothing.lower();
            }
            ControlEvent::Quit => self.stop(),
        }
    }

    /// Transition to `Stopped`, blanking the strip exactly once no matter
    /// how many times stop is requested.
    pub fn stop(&mut self) {
        if self.state == DriverState::Stopped {
            return;
        }
        self.state = DriverState::Stopped;
        if let Err(e) = self.leds.blank() {
            warn!("led blank on shutdown failed: {e}");
        }
    }
}

fn push_to_strip(strip: &mut dyn LedStrip, frame: &VisualFrame) -> Result<(), SinkError> {
    for (i, &color) in frame.colors.iter().enumerate().take(strip.len()) {
        strip.set(i, color);
    }
    strip.show()
}
