use crate::metrics::mae::Mae;
use crate::metrics::rmse::Rmse;
use crate::metrics::PredictionMetric;

/// Aggregates the error metrics for one predictor under evaluation.
pub struct EvaluationReporter {
    mae: Mae,
    rmse: Rmse,
}

impl Default for EvaluationReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationReporter {
    pub fn new() -> EvaluationReporter {
        EvaluationReporter {
            mae: Mae::new(),
            rmse: Rmse::new(),
        }
    }

    pub fn add(&mut self, predicted: f64, actual: f64) {
        self.mae.add(predicted, actual);
        self.rmse.add(predicted, actual);
    }

    pub fn result(&self) -> String {
        let mae_score = format!("{:.4}", self.mae.result());
        let rmse_score = format!("{:.4}", self.rmse.result());
        format!("{},{}", mae_score, rmse_score)
    }

    pub fn get_name(&self) -> String {
        format!("{},{}", self.mae.get_name(), self.rmse.get_name())
    }
}

#[cfg(test)]
mod evaluation_reporter_test {
    use super::*;

    #[test]
    fn should_report_all_metrics() {
        let mut reporter = EvaluationReporter::new();
        reporter.add(3.0, 4.0);
        reporter.add(5.0, 3.0);
        assert_eq!("Mae,Rmse", reporter.get_name());
        assert_eq!("1.5000,1.5811", reporter.result());
    }
}
