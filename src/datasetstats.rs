use chrono::NaiveDateTime;
use hashbrown::HashMap;
use num_format::{Locale, ToFormattedString};
use rayon::prelude::*;
use std::sync::Arc;

use crate::io::{ItemId, Rating, Time, UserId};
use crate::userknn::rating_store::RatingStore;

pub struct SharedHandlesAndConfig {
    pub rating_store: Arc<RatingStore>,
    pub data_stats: Arc<RatingDataStats>,
    pub neighborhood_size_k: usize,
    pub num_items_to_recommend: usize,
    pub qty_workers: usize,
}

pub struct RatingDataStats {
    pub descriptive_name: String,
    pub qty_ratings: usize,
    pub qty_unique_user_ids: usize,
    pub qty_unique_item_ids: usize,
    pub min_time_date_time: NaiveDateTime,
    pub max_time_date_time: NaiveDateTime,
    pub ratings_per_user_p50: u64,
    pub ratings_per_user_p90: u64,
    pub ratings_per_user_p100: u64,
}

pub fn determine_rating_data_statistics(
    descriptive_name: &str,
    ratings: &[(UserId, ItemId, Rating, Time)],
) -> RatingDataStats {
    let qty_ratings = ratings.len();

    let mut user_ids: Vec<UserId> = ratings
        .into_par_iter()
        .map(|(user_id, _item_id, _rating, _time)| *user_id)
        .collect();
    user_ids.par_sort_unstable();
    user_ids.dedup();
    let qty_unique_user_ids = user_ids.len();

    let mut item_ids: Vec<ItemId> = ratings
        .into_par_iter()
        .map(|(_user_id, item_id, _rating, _time)| *item_id)
        .collect();
    item_ids.par_sort_unstable();
    item_ids.dedup();
    let qty_unique_item_ids = item_ids.len();

    let min_time = ratings
        .par_iter()
        .map(|(_user_id, _item_id, _rating, time)| *time)
        .min()
        .unwrap_or(0);
    let max_time = ratings
        .par_iter()
        .map(|(_user_id, _item_id, _rating, time)| *time)
        .max()
        .unwrap_or(0);
    let min_time_date_time = NaiveDateTime::from_timestamp(min_time as i64, 0);
    let max_time_date_time = NaiveDateTime::from_timestamp(max_time as i64, 0);

    let mut qty_ratings_per_user: HashMap<UserId, u64> = HashMap::new();
    for (user_id, _item_id, _rating, _time) in ratings.iter() {
        *qty_ratings_per_user.entry(*user_id).or_insert(0) += 1;
    }
    let mut rating_counts: Vec<u64> = qty_ratings_per_user
        .into_iter()
        .map(|(_user_id, qty)| qty)
        .collect();
    rating_counts.par_sort_unstable();
    let ratings_per_user_p50 = percentile(&rating_counts, 50.0);
    let ratings_per_user_p90 = percentile(&rating_counts, 90.0);
    let ratings_per_user_p100 = percentile(&rating_counts, 100.0);

    println!("Loaded {}", descriptive_name);
    println!("\tRatings: {}", qty_ratings.to_formatted_string(&Locale::en));
    println!(
        "\tUsers: {}",
        qty_unique_user_ids.to_formatted_string(&Locale::en)
    );
    println!(
        "\tItems: {}",
        qty_unique_item_ids.to_formatted_string(&Locale::en)
    );
    println!("\tSpan: {} / {}", min_time_date_time, max_time_date_time);
    print!("\tRatings per user percentiles: ");
    print!(" p50={}", &ratings_per_user_p50);
    print!(" p90={}", &ratings_per_user_p90);
    println!(" p100={}", &ratings_per_user_p100);

    RatingDataStats {
        descriptive_name: descriptive_name.to_string(),
        qty_ratings,
        qty_unique_user_ids,
        qty_unique_item_ids,
        min_time_date_time,
        max_time_date_time,
        ratings_per_user_p50,
        ratings_per_user_p90,
        ratings_per_user_p100,
    }
}

/// Nearest-rank percentile over an ascending slice of counts.
fn percentile(sorted_counts: &[u64], q: f64) -> u64 {
    if sorted_counts.is_empty() {
        return 0;
    }
    let index = ((q / 100.0) * (sorted_counts.len() - 1) as f64).round() as usize;
    sorted_counts[index]
}

#[cfg(test)]
mod datasetstats_test {
    use super::*;

    #[test]
    fn should_determine_rating_data_statistics() {
        let ratings = vec![
            (1, 10, 4.0, 100),
            (1, 20, 3.0, 400),
            (1, 30, 5.0, 250),
            (2, 10, 2.0, 300),
        ];
        let stats = determine_rating_data_statistics("unittest ratings", &ratings);

        assert_eq!(4, stats.qty_ratings);
        assert_eq!(2, stats.qty_unique_user_ids);
        assert_eq!(3, stats.qty_unique_item_ids);
        assert_eq!(100, stats.min_time_date_time.timestamp());
        assert_eq!(400, stats.max_time_date_time.timestamp());
        assert_eq!(3, stats.ratings_per_user_p100);
    }

    #[test]
    fn should_take_nearest_rank_percentiles() {
        let counts = vec![1, 2, 3, 4, 10];
        assert_eq!(3, percentile(&counts, 50.0));
        assert_eq!(10, percentile(&counts, 100.0));
        assert_eq!(0, percentile(&[], 50.0));
    }
}
