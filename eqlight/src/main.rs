mod capture;
mod config;
mod keys;
mod led;
mod term;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cpal::traits::StreamTrait;
use eq_dsp::SpectralAnalyzer;
use eq_viz::{DriverState, FrameScheduler, LedStrip, LinearHue, SmoothingControl, ThresholdBanding};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "eqlight.log";

fn main() -> Result<()> {
    let cli = config::Cli::parse();

    if cli.list_devices {
        let host = cpal::default_host();
        for (i, name) in capture::input_device_names(&host).iter().enumerate() {
            println!("{i}: {name}");
        }
        return Ok(());
    }

    cli.validate()?;
    init_logging()?;
    run(cli)
}

// The display owns the screen while running, so logs go to a file; steer the
// level with RUST_LOG.
fn init_logging() -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
        .with_context(|| format!("could not open {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    Ok(())
}

fn run(cli: config::Cli) -> Result<()> {
    let host = cpal::default_host();
    let device = capture::select_device(&host, cli.device)?;

    let analyzer = SpectralAnalyzer::new(cli.block_size, cli.sample_rate, cli.highpass);
    let smoothing = Arc::new(SmoothingControl::new(cli.smoothing));

    let text = term::TermSink::new(cli.bars, cli.max_height, Box::new(ThresholdBanding))
        .context("could not take over the terminal")?;
    // Strip preview sits two rows under the bars, below the status line.
    let leds: Box<dyn LedStrip + Send> = if cli.no_led {
        Box::new(led::NullStrip::new(cli.bars))
    } else {
        Box::new(led::PreviewStrip::new(
            cli.bars,
            cli.max_height.saturating_add(2),
        ))
    };

    let mut scheduler = FrameScheduler::new(
        analyzer,
        cli.channels as usize,
        cli.bars,
        cli.max_height,
        smoothing.clone(),
        Box::new(LinearHue),
        Box::new(text),
        leds,
    );
    scheduler.start();
    let scheduler = Arc::new(Mutex::new(scheduler));
    let stop = Arc::new(AtomicBool::new(false));

    let stream = capture::build_input_stream(
        &device,
        &capture::stream_config(cli.channels, cli.sample_rate, cli.block_size),
        cli.block_size,
        scheduler.clone(),
        stop.clone(),
    )?;
    stream.play().context("failed to start capture stream")?;

    let listener = keys::spawn_listener(smoothing, scheduler.clone(), stop.clone());

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if let Ok(s) = scheduler.lock() {
            if s.state() == DriverState::Stopped {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    // Silence the callbacks before the final stop so the blank is the last
    // thing the strip sees; stop() is a no-op if the listener already ran it.
    stop.store(true, Ordering::Relaxed);
    drop(stream);
    if let Ok(mut s) = scheduler.lock() {
        s.stop();
    }
    let _ = listener.join();

    info!("stopped");
    Ok(())
}
