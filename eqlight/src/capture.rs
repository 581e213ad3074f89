use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, Device, Host, SampleRate, Stream, StreamConfig, StreamError};
use eq_viz::FrameScheduler;
use tracing::{error, info, warn};

/// Names of every input device the host exposes, in index order.
pub fn input_device_names(host: &Host) -> Vec<String> {
    match host.input_devices() {
        Ok(devices) => devices
            .map(|d| d.name().unwrap_or_else(|_| "<unnamed>".into()))
            .collect(),
        Err(e) => {
            warn!("could not enumerate input devices: {e}");
            Vec::new()
        }
    }
}

/// Pick an input device by index, or the system default when unset.
pub fn select_device(host: &Host, index: Option<usize>) -> Result<Device> {
    match index {
        None => host
            .default_input_device()
            .ok_or_else(|| anyhow!("no default input device available")),
        Some(i) => host
            .input_devices()
            .context("could not enumerate input devices")?
            .nth(i)
            .ok_or_else(|| anyhow!("input device index {i} out of range")),
    }
}

pub fn stream_config(channels: u16, sample_rate: u32, block_size: usize) -> StreamConfig {
    StreamConfig {
        channels,
        sample_rate: SampleRate(sample_rate),
        buffer_size: BufferSize::Fixed(block_size as u32),
    }
}

/// Collects callback deliveries into exact frames. cpal makes no promise
/// about callback sizes even with a fixed buffer size, so samples are staged
/// until a full `block_size * channels` frame is available.
struct FrameAccumulator {
    frame: Vec<f32>,
    filled: usize,
}

impl FrameAccumulator {
    fn new(frame_len: usize) -> Self {
        Self {
            frame: vec![0.0; frame_len],
            filled: 0,
        }
    }

    fn push(&mut self, data: &[f32], mut on_frame: impl FnMut(&[f32])) {
        for &sample in data {
            self.frame[self.filled] = sample;
            self.filled += 1;
            if self.filled == self.frame.len() {
                self.filled = 0;
                on_frame(&self.frame);
            }
        }
    }
}

/// One capture delivery: stage the samples and run the pipeline on every
/// completed frame. A poisoned scheduler means some thread panicked inside
/// the pipeline and no frame will ever render again, so raise the stop flag
/// instead of freezing the display silently.
fn drain_delivery(
    accumulator: &mut FrameAccumulator,
    data: &[f32],
    scheduler: &Mutex<FrameScheduler>,
    stop: &AtomicBool,
) {
    match scheduler.lock() {
        Ok(mut scheduler) => accumulator.push(data, |frame| scheduler.process_frame(frame)),
        Err(_) => {
            error!("pipeline lock poisoned, stopping");
            stop.store(true, Ordering::Relaxed);
        }
    }
}

/// Build the capture stream. Each completed frame runs the scheduler's
/// pipeline on the audio thread; stream errors that mean the device is gone
/// raise the stop flag, anything else is logged and capture continues.
pub fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    block_size: usize,
    scheduler: Arc<Mutex<FrameScheduler>>,
    stop: Arc<AtomicBool>,
) -> Result<Stream> {
    info!(
        device = %device.name().unwrap_or_else(|_| "<unnamed>".into()),
        sample_rate = config.sample_rate.0,
        channels = config.channels,
        block_size,
        "opening capture stream"
    );

    let mut accumulator = FrameAccumulator::new(block_size * config.channels as usize);
    let data_stop = stop.clone();
    let stream = device
        .build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                drain_delivery(&mut accumulator, data, &scheduler, &data_stop);
            },
            move |err| match err {
                StreamError::DeviceNotAvailable => {
                    error!("capture device disappeared, stopping");
                    stop.store(true, Ordering::Relaxed);
                }
                other => warn!("capture stream reported: {other}"),
            },
            None,
        )
        .context("failed to build input stream")?;
    Ok(stream)
}
