pub mod band_aggregator;
pub mod color_strategy;
pub mod driver;
pub mod intensity;
pub mod smoother;
pub mod types;

pub use band_aggregator::BandAggregator;
pub use color_strategy::{ColorContext, ColorStrategy, LinearHue, ThresholdBanding, Tier};
pub use driver::{
    ControlEvent, DriverState, FrameScheduler, FrameSink, LedStrip, SinkError, SmoothingControl,
    SMOOTH_STEP,
};
pub use intensity::IntensityMapper;
pub use smoother::TemporalSmoother;
pub use types::{Rgb, VisualFrame};
