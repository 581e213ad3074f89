use crate::types::Rgb;

/// Everything a color policy may key on when coloring one cell or bar.
pub struct ColorContext {
    pub band_index: usize,
    pub num_bands: usize,
    /// 1-based row within the bar, counted from the bottom. For whole-bar
    /// coloring this is the bar's height.
    pub row: u16,
    pub height: u16,
    pub max_height: u16,
}

pub trait ColorStrategy {
    fn color(&self, context: &ColorContext) -> Rgb;
}

/// Red-to-blue gradient keyed on loudness; the LED strip policy.
pub struct LinearHue;

impl ColorStrategy for LinearHue {
    fn color(&self, context: &ColorContext) -> Rgb {
        if context.max_height == 0 {
            return Rgb::BLACK;
        }
        let intensity =
            ((context.height as f32 / context.max_height as f32) * 255.0).round() as u8;
        Rgb::new(intensity, 0, 255 - intensity)
    }
}

/// Severity tier of a row position relative to the display height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Calm,
    Elevated,
    Peak,
}

impl Tier {
    /// Rows at or below 50% of the display are calm, up to 80% elevated,
    /// the rest peak. `row` is 1-based from the bottom.
    pub fn for_row(row: u16, max_height: u16) -> Tier {
        let row = row as f32;
        let max = max_height as f32;
        if row <= max * 0.5 {
            Tier::Calm
        } else if row <= max * 0.8 {
            Tier::Elevated
        } else {
            Tier::Peak
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Tier::Calm => Rgb::new(0, 255, 0),
            Tier::Elevated => Rgb::new(255, 255, 0),
            Tier::Peak => Rgb::new(255, 0, 0),
        }
    }
}

/// Three-tier row coloring; the terminal policy.
pub struct ThresholdBanding;

impl ColorStrategy for ThresholdBanding {
    fn color(&self, context: &ColorContext) -> Rgb {
        Tier::for_row(context.row, context.max_height).rgb()
    }
}
