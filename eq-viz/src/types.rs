/// 8-bit RGB triple, the color vocabulary shared by both sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One rendered frame: a bar height in `[0, max_height]` plus one color per
/// band. Produced once per audio frame, handed to the sinks, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFrame {
    pub heights: Vec<u16>,
    pub colors: Vec<Rgb>,
}

impl VisualFrame {
    pub fn bars(&self) -> usize {
        self.heights.len()
    }
}
