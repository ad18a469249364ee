//! ECG extraction settings.

/// Chart speeds printed on AliveCor reports and the page to read.
#[derive(Debug, Clone, PartialEq)]
pub struct EcgOptions {
    /// Paper speed in millimetres per second
    pub time_scale_mm_per_s: f64,

    /// Gain in millimetres per millivolt
    pub voltage_scale_mm_per_mv: f64,

    /// Zero-based page holding the rhythm strip
    pub page: usize,
}

impl EcgOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_scale(mut self, mm_per_s: f64) -> Self {
        self.time_scale_mm_per_s = mm_per_s;
        self
    }

    pub fn with_voltage_scale(mut self, mm_per_mv: f64) -> Self {
        self.voltage_scale_mm_per_mv = mm_per_mv;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Seconds per point of horizontal distance.
    pub(crate) fn seconds_per_point(&self) -> f64 {
        super::MM_PER_POINT / self.time_scale_mm_per_s
    }

    /// Millivolts per point of vertical distance.
    pub(crate) fn millivolts_per_point(&self) -> f64 {
        super::MM_PER_POINT / self.voltage_scale_mm_per_mv
    }
}

impl Default for EcgOptions {
    fn default() -> Self {
        Self {
            time_scale_mm_per_s: 25.0,
            voltage_scale_mm_per_mv: 10.0,
            page: 0,
        }
    }
}
