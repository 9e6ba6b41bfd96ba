use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use tracing::debug;

/// Accumulating timer, started and stopped around the measured sections.
pub struct Stopwatch {
    start: Instant,
    name: String,
    elapsed_duration: Duration,
}

impl Stopwatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            elapsed_duration: Duration::ZERO,
            name: name.into(),
        }
    }

    pub fn start(&mut self) {
        self.start = Instant::now();
    }

    pub fn stop(&mut self) {
        self.elapsed_duration += self.start.elapsed();
    }

    pub fn total_duration(&self) -> Duration {
        self.elapsed_duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn report(&self) {
        debug!("{}", self);
    }
}

impl Display for Stopwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {:?}", self.name, self.elapsed_duration)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn should_accumulate_durations() {
        let mut stopwatch = Stopwatch::new("test");
        stopwatch.start();
        std::thread::sleep(Duration::from_millis(2));
        stopwatch.stop();
        let first = stopwatch.total_duration();

        stopwatch.start();
        std::thread::sleep(Duration::from_millis(2));
        stopwatch.stop();

        assert!(stopwatch.total_duration() > first);
        assert!(stopwatch.to_string().starts_with("[test]"));
    }
}
