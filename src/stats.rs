/// Rolling per-window counters for the sample stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Report {
    pub samples: u32,
    pub failures: u32,
    pub window_ms: u64,
}

impl Report {
    /// Achieved sample rate over the window.
    pub fn rate_hz(&self) -> u32 {
        if self.window_ms == 0 {
            return 0;
        }
        ((self.samples as u64 * 1000) / self.window_ms) as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SampleStats {
    period_ms: u64,
    window_start_ms: u64,
    samples: u32,
    failures: u32,
}

impl SampleStats {
    pub const fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            window_start_ms: now_ms,
            samples: 0,
            failures: 0,
        }
    }

    pub fn record_sample(&mut self) {
        self.samples += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Close the window once a full period has passed and hand back its counts.
    pub fn report(&mut self, now_ms: u64) -> Option<Report> {
        let window_ms = now_ms.saturating_sub(self.window_start_ms);
        if window_ms < self.period_ms {
            return None;
        }

        let report = Report {
            samples: self.samples,
            failures: self.failures,
            window_ms,
        };
        self.samples = 0;
        self.failures = 0;
        self.window_start_ms = now_ms;
        Some(report)
    }
}
