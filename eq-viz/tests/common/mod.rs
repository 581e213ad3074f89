use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use eq_viz::{FrameSink, LedStrip, Rgb, SinkError, VisualFrame};

/// Interleaved stereo frame carrying one tone on both channels.
pub fn stereo_sine(freq_hz: f32, sample_rate: u32, block: usize, amplitude: f32) -> Vec<f32> {
    let mut frame = Vec::with_capacity(block * 2);
    for i in 0..block {
        let s = amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin();
        frame.push(s);
        frame.push(s);
    }
    frame
}

/// Text sink that counts renders and keeps the last frame behind shared
/// handles, so the test retains visibility after the scheduler takes
/// ownership of the boxed sink.
pub struct RecordingSink {
    renders: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<VisualFrame>>>,
}

impl RecordingSink {
    #[allow(clippy::type_complexity)]
    pub fn new() -> (Self, Arc<AtomicUsize>, Arc<Mutex<Option<VisualFrame>>>) {
        let renders = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None));
        (
            Self {
                renders: renders.clone(),
                last: last.clone(),
            },
            renders,
            last,
        )
    }
}

impl FrameSink for RecordingSink {
    fn render(&mut self, frame: &VisualFrame, _smoothing: f32) -> Result<(), SinkError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(frame.clone());
        }
        Ok(())
    }
}

/// Strip that records show/blank counts through shared counters.
pub struct CountingStrip {
    pixels: Vec<Rgb>,
    shows: Arc<AtomicUsize>,
    blanks: Arc<AtomicUsize>,
}

impl CountingStrip {
    pub fn new(len: usize) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let shows = Arc::new(AtomicUsize::new(0));
        let blanks = Arc::new(AtomicUsize::new(0));
        (
            Self {
                pixels: vec![Rgb::BLACK; len],
                shows: shows.clone(),
                blanks: blanks.clone(),
            },
            shows,
            blanks,
        )
    }
}

impl LedStrip for CountingStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set(&mut self, index: usize, color: Rgb) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = color;
        }
    }

    fn show(&mut self) -> Result<(), SinkError> {
        self.shows.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn blank(&mut self) -> Result<(), SinkError> {
        for px in &mut self.pixels {
            *px = Rgb::BLACK;
        }
        self.blanks.fetch_add(1, Ordering::SeqCst);
        self.show()
    }
}

/// Sink that always fails, for exercising the independent-dispatch rule.
pub struct FailingSink;

impl FrameSink for FailingSink {
    fn render(&mut self, _frame: &VisualFrame, _smoothing: f32) -> Result<(), SinkError> {
        Err(SinkError::Backend("display unplugged".into()))
    }
}
