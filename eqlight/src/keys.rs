use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eq_viz::{ControlEvent, FrameScheduler, SmoothingControl};
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn map_key(key: KeyEvent) -> Option<ControlEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => Some(ControlEvent::Raise),
        KeyCode::Char('-') => Some(ControlEvent::Lower),
        KeyCode::Char('q') | KeyCode::Esc => Some(ControlEvent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ControlEvent::Quit)
        }
        _ => None,
    }
}

/// Apply one control event from the listener side. Factor adjustments write
/// the atomic cell directly and never contend with the audio thread; only
/// quit takes the scheduler lock, where the shutdown blank must run.
/// Returns true when the listener should exit.
fn apply(
    smoothing: &SmoothingControl,
    scheduler: &Mutex<FrameScheduler>,
    event: ControlEvent,
) -> bool {
    match event {
        ControlEvent::Raise => {
            smoothing.raise();
            false
        }
        ControlEvent::Lower => {
            smoothing.lower();
            false
        }
        ControlEvent::Quit => {
            if let Ok(mut scheduler) = scheduler.lock() {
                scheduler.stop();
            }
            true
        }
    }
}

/// Listener thread: polls raw-mode key events, adjusts the shared factor,
/// and requests shutdown on quit. Exits when the stop flag rises or after
/// handling a quit.
pub fn spawn_listener(
    smoothing: Arc<SmoothingControl>,
    scheduler: Arc<Mutex<FrameScheduler>>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {
                    let event = match event::read() {
                        Ok(event) => event,
                        Err(e) => {
                            warn!("key read failed: {e}");
                            break;
                        }
                    };
                    let Event::Key(key) = event else { continue };
                    let Some(control) = map_key(key) else {
                        continue;
                    };
                    if apply(&smoothing, &scheduler, control) {
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                }
                Err(e) => {
                    warn!("key poll failed: {e}");
                    break;
                }
            }
        }
    })
}
