use nocturne::config::AppConfig;
use nocturne::io::DatasetImporter;
use nocturne::objective;
use nocturne::userknn::rating_store::RatingStore;
use nocturne::userknn::Metric;

use indicatif::ProgressBar;
use std::path::Path;

extern crate csv;
use csv::Writer;

fn main() -> anyhow::Result<()> {
    // get params from config file
    let config_path = std::env::args()
        .nth(1)
        .expect("Config file not specified!");
    let config = AppConfig::new(config_path);
    let save_records = config.experiment.save_records;
    let out_path = config.experiment.out_path;
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
        "Imported {} ratings of {} users",
        summary.qty_ratings, summary.qty_new_users
    );

    // Possible values for hyperparameters
    let neighborhood_size_k_choices = [5, 10, 20, 50, 100];
    let metric_choices = [Metric::Pearson, Metric::Cosine];

    // Progress bar
    let total_num_iterations = neighborhood_size_k_choices.len() * metric_choices.len();
    let pb = ProgressBar::new(total_num_iterations as u64);

    let mut wtr = Writer::from_path(out_path)?;
    if save_records {
        // csv writer for storing all values of the whole procedure
        wtr.write_record(&["iteration", "metric", "neighborhood_size_k", "RMSE"])?;
    }

    // mutable variables
    let mut iteration = 0;
    let mut best_value = std::f64::INFINITY;
    let mut best_neighborhood_size_k = 0;
    let mut best_metric = Metric::Pearson;

    // exhaustive grid search, RMSE is minimized
    for metric in metric_choices {
        for neighborhood_size_k in neighborhood_size_k_choices {
            // increment progress bar
            pb.inc(1);
            // get the result of the objective function
            // with the current combination of hyperparameters
            let v = objective::objective(&store, metric, neighborhood_size_k, max_evaluations);

            if save_records {
                // Save current values
                wtr.write_record(&[
                    (iteration as i32).to_string(),
                    format!("{:?}", metric),
                    neighborhood_size_k.to_string(),
                    v.to_string(),
                ])?;
            }
            // update current best values
            if v < best_value {
                best_value = v;
                best_neighborhood_size_k = neighborhood_size_k;
                best_metric = metric;
            }
            iteration += 1;
        }
    }

    // print best value for each hyperparameter
    println!("Best metric: {:?}", best_metric);
    println!("Best neighborhood_size_k: {}", best_neighborhood_size_k);
    println!("Best value for the goal metric: {}", best_value);

    wtr.flush()?;

    Ok(())
}
