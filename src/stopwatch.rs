use std::time::Instant;
use tdigest::TDigest;

#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
    prediction_durations: Vec<f64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
            prediction_durations: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop(&mut self) {
        let duration = self.start_time.elapsed();
        self.prediction_durations.push(duration.as_micros() as f64);
    }

    pub fn get_n(&self) -> usize {
        self.prediction_durations.len()
    }

    /// Estimated duration at quantile `q` in [0, 1].
    pub fn get_percentile_in_micros(&self, q: f64) -> f64 {
        let t_digest = TDigest::new_with_size(100);
        let sorted_digest = t_digest.merge_unsorted(self.prediction_durations.clone());
        sorted_digest.estimate_quantile(q)
    }
}

#[cfg(test)]
mod stopwatch_test {
    use super::*;

    #[test]
    fn should_count_measurements() {
        let mut stopwatch = Stopwatch::new();
        stopwatch.start();
        stopwatch.stop();
        stopwatch.start();
        stopwatch.stop();
        assert_eq!(2, stopwatch.get_n());
        assert!(stopwatch.get_percentile_in_micros(0.9) >= 0.0);
    }
}
