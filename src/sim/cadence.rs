/// Fixed-period driver fed by the master tick.
///
/// Elapsed time accumulates and the driver fires once per whole period, so
/// relative rates hold whatever the master tick is.
#[derive(Debug, Clone)]
pub struct Cadence {
    period_ms: u64,
    acc_ms: u64,
    running: bool,
}

impl Cadence {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            acc_ms: 0,
            running: true,
        }
    }

    /// Number of times the driver fires for `dt_ms` of elapsed time.
    pub fn advance(&mut self, dt_ms: u64) -> u64 {
        if !self.running {
            return 0;
        }
        self.acc_ms += dt_ms;
        let fires = self.acc_ms / self.period_ms;
        self.acc_ms %= self.period_ms;
        fires
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.acc_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }
}
