use itertools::Itertools;

use crate::metrics::rmse::Rmse;
use crate::metrics::PredictionMetric;
use crate::userknn::prediction::PredictionEngine;
use crate::userknn::rating_store::RatingStore;
use crate::userknn::Metric;

// objective function for hyperparameter sweeps: replay known ratings through
// the predictor and report the error, lower is better
pub fn objective(
    store: &RatingStore,
    metric: Metric,
    neighborhood_size_k: usize,
    max_evaluations: usize,
) -> f64 {
    let engine = PredictionEngine::new(store);
    let mut rmse = Rmse::new();
    let mut qty_evaluated = 0;

    let mut user_ids = store.user_ids().collect_vec();
    user_ids.sort_unstable();

    'users: for user_id in user_ids {
        let user = match store.get_user(user_id) {
            Some(user) => user,
            None => continue,
        };
        let mut item_ids = user.rated_items().collect_vec();
        item_ids.sort_unstable();

        for item_id in item_ids {
            if qty_evaluated >= max_evaluations {
                break 'users;
            }
            qty_evaluated += 1;

            let actual = user.rating(item_id);
            if let Ok(predicted) =
                engine.predict_with_metric(metric, user_id, item_id, neighborhood_size_k)
            {
                rmse.add(predicted, actual);
            }
        }
    }

    rmse.result()
}

#[cfg(test)]
mod objective_test {
    use super::*;

    #[test]
    fn should_be_near_zero_for_a_lone_self_predicting_user() {
        let mut store = RatingStore::new();
        store.ingest_rating(5, 1, 5.0);
        store.ingest_rating(5, 2, 1.0);

        // the only rater of each item is user 5 itself, so the prediction
        // echoes the known rating
        let error = objective(&store, Metric::Pearson, 20, 1000);
        assert!(error < 1e-9);
    }

    #[test]
    fn should_respect_the_evaluation_cap() {
        let mut store = RatingStore::new();
        store.ingest_rating(5, 1, 5.0);
        store.ingest_rating(5, 2, 1.0);

        let error = objective(&store, Metric::Cosine, 20, 0);
        assert_eq!(0.0, error);
    }
}
