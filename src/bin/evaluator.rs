use itertools::Itertools;
use std::path::Path;

use nocturne::config::AppConfig;
use nocturne::io::DatasetImporter;
use nocturne::metrics::evaluation_reporter::EvaluationReporter;
use nocturne::stopwatch::Stopwatch;
use nocturne::userknn::prediction::PredictionEngine;
use nocturne::userknn::rating_store::RatingStore;

/// Replays known ratings through the baseline, correlation-weighted and
/// cosine-weighted predictors and reports the error profile of each.
fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path);

    let neighborhood_size_k = config.model.neighborhood_size_k;
    let max_evaluations = config.experiment.max_evaluations;

    let ratings_data_path = Path::new(&config.data.ratings_data_path);
    if !ratings_data_path.is_file() {
        panic!(
            "Ratings data file does not exist: {}",
            &config.data.ratings_data_path
        )
    }

    let mut store = RatingStore::new();
    let mut importer = DatasetImporter::new();
    let summary = importer.import_ratings(
        &mut store,
        &config.data.ratings_data_path,
        &config.data.delimiter,
    );
    println!(
        "Imported {} ratings of {} users from {}",
        summary.qty_ratings, summary.qty_new_users, &config.data.ratings_data_path
    );
    if !config.data.items_data_path.is_empty() {
        let qty_items = importer.import_items(
            &mut store,
            &config.data.items_data_path,
            &config.data.delimiter,
        );
        println!(
            "Imported {} item records from {}",
            qty_items, &config.data.items_data_path
        );
    }

    let engine = PredictionEngine::new(&store);
    let mut baseline_reporter = EvaluationReporter::new();
    let mut pearson_reporter = EvaluationReporter::new();
    let mut cosine_reporter = EvaluationReporter::new();
    let mut stopwatch = Stopwatch::new();

    let mut user_ids = store.user_ids().collect_vec();
    user_ids.sort_unstable();

    let mut qty_evaluated = 0;
    'users: for user_id in user_ids {
        let user = store.get_user(user_id).unwrap();
        let mut item_ids = user.rated_items().collect_vec();
        item_ids.sort_unstable();

        for item_id in item_ids {
            if qty_evaluated >= max_evaluations {
                break 'users;
            }
            qty_evaluated += 1;
            let actual = user.rating(item_id);

            let baseline = engine.baseline_rating(user_id, item_id).unwrap();
            baseline_reporter.add(baseline, actual);

            stopwatch.start();
            let pearson = engine
                .predict_rating(user_id, item_id, neighborhood_size_k)
                .unwrap();
            stopwatch.stop();
            pearson_reporter.add(pearson, actual);

            let cosine = engine
                .predict_cosine_rating(user_id, item_id, neighborhood_size_k)
                .unwrap();
            cosine_reporter.add(cosine, actual);
        }
    }

    println!("===============================================================");
    println!("===             START EVALUATING RATING DATA               ====");
    println!("===============================================================");
    println!("model,{}", baseline_reporter.get_name());
    println!("baseline,{}", baseline_reporter.result());
    println!("pearson,{}", pearson_reporter.result());
    println!("cosine,{}", cosine_reporter.result());
    println!("Qty evaluations: {}", stopwatch.get_n());
    println!("Prediction latency");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(0.9));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(0.95));
    println!(
        "p99.5 (microseconds): {}",
        stopwatch.get_percentile_in_micros(0.995)
    );
}
