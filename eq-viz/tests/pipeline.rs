use std::sync::atomic::Ordering;
use std::sync::Arc;

use eq_dsp::SpectralAnalyzer;
use eq_viz::{
    BandAggregator, ControlEvent, DriverState, FrameScheduler, LinearHue, SmoothingControl,
};

pub mod common;
use common::*;

const SAMPLE_RATE: u32 = 48_000;
const BLOCK: usize = 1024;
const BARS: usize = 40;
const MAX_HEIGHT: u16 = 20;

fn scheduler_with_probes() -> (
    FrameScheduler,
    Arc<std::sync::atomic::AtomicUsize>,
    Arc<std::sync::Mutex<Option<eq_viz::VisualFrame>>>,
    Arc<std::sync::atomic::AtomicUsize>,
) {
    let analyzer = SpectralAnalyzer::new(BLOCK, SAMPLE_RATE, None);
    let (sink, renders, last) = RecordingSink::new();
    let (strip, _shows, blanks) = CountingStrip::new(BARS);
    let scheduler = FrameScheduler::new(
        analyzer,
        2,
        BARS,
        MAX_HEIGHT,
        Arc::new(SmoothingControl::new(0.0)),
        Box::new(LinearHue),
        Box::new(sink),
        Box::new(strip),
    );
    (scheduler, renders, last, blanks)
}

#[test]
fn sine_tone_lights_the_band_holding_bin_21() {
    let (mut scheduler, _renders, last, _blanks) = scheduler_with_probes();
    scheduler.start();
    scheduler.process_frame(&stereo_sine(1000.0, SAMPLE_RATE, BLOCK, 0.5));

    let frame = last.lock().unwrap().clone().expect("a frame was rendered");
    assert_eq!(frame.bars(), BARS);

    // 1000 Hz -> bin round(1000 / (48000/1024)) = 21; the argmax band must
    // be the one whose range holds that bin.
    let aggregator = BandAggregator::new(BLOCK / 2 + 1, BARS);
    let expected_band = aggregator.band_for_bin(21).unwrap();
    let argmax = frame
        .heights
        .iter()
        .enumerate()
        .max_by_key(|&(_, &h)| h)
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(argmax, expected_band);
    assert_eq!(frame.heights[argmax], MAX_HEIGHT);
}

#[test]
fn frames_are_ignored_until_started() {
    let (mut scheduler, renders, _last, _blanks) = scheduler_with_probes();
    assert_eq!(scheduler.state(), DriverState::Idle);
    scheduler.process_frame(&stereo_sine(1000.0, SAMPLE_RATE, BLOCK, 0.5));
    assert_eq!(renders.load(Ordering::SeqCst), 0);
}

#[test]
fn quit_blanks_the_strip_once_and_stops_processing() {
    let (mut scheduler, renders, _last, blanks) = scheduler_with_probes();
    scheduler.start();
    scheduler.process_frame(&stereo_sine(1000.0, SAMPLE_RATE, BLOCK, 0.5));
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    scheduler.handle_event(ControlEvent::Quit);
    assert_eq!(scheduler.state(), DriverState::Stopped);
    assert_eq!(blanks.load(Ordering::SeqCst), 1);

    // Late frames and repeated stops change nothing.
    scheduler.process_frame(&stereo_sine(1000.0, SAMPLE_RATE, BLOCK, 0.5));
    scheduler.stop();
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(blanks.load(Ordering::SeqCst), 1);
}

#[test]
fn malformed_frame_stops_the_pipeline() {
    let (mut scheduler, renders, _last, blanks) = scheduler_with_probes();
    scheduler.start();
    scheduler.process_frame(&[0.0; 17]);
    assert_eq!(scheduler.state(), DriverState::Stopped);
    assert_eq!(renders.load(Ordering::SeqCst), 0);
    assert_eq!(blanks.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_text_sink_does_not_starve_the_strip() {
    let analyzer = SpectralAnalyzer::new(BLOCK, SAMPLE_RATE, None);
    let (strip, shows, _blanks) = CountingStrip::new(BARS);
    let mut scheduler = FrameScheduler::new(
        analyzer,
        2,
        BARS,
        MAX_HEIGHT,
        Arc::new(SmoothingControl::new(0.8)),
        Box::new(LinearHue),
        Box::new(FailingSink),
        Box::new(strip),
    );
    scheduler.start();
    scheduler.process_frame(&stereo_sine(1000.0, SAMPLE_RATE, BLOCK, 0.5));
    assert_eq!(scheduler.state(), DriverState::Running);
    assert_eq!(shows.load(Ordering::SeqCst), 1);
}

#[test]
fn control_events_drive_the_shared_factor() {
    let (mut scheduler, _renders, _last, _blanks) = scheduler_with_probes();
    let control = scheduler.smoothing().clone();
    assert_eq!(control.get(), 0.0);
    scheduler.handle_event(ControlEvent::Raise);
    scheduler.handle_event(ControlEvent::Raise);
    assert!((control.get() - 0.1).abs() < 1e-6);
    scheduler.handle_event(ControlEvent::Lower);
    assert!((control.get() - 0.05).abs() < 1e-6);
}
