/// One live WPM reading, taken when the clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WpmSample {
    pub elapsed: u32,
    pub wpm: u32,
}

impl WpmSample {
    pub fn new(elapsed: u32, wpm: u32) -> Self {
        Self { elapsed, wpm }
    }
}

impl From<WpmSample> for (f64, f64) {
    fn from(s: WpmSample) -> Self {
        (s.elapsed as f64, s.wpm as f64)
    }
}
