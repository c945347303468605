use dary_heap::OctonaryHeap;

use crate::io::{ItemId, UserId};
use crate::userknn::rating_store::RatingStore;
use crate::userknn::similarity::SimilarityEngine;
use crate::userknn::{Metric, NeighborScore, UnknownUser};

pub const DEFAULT_NEIGHBORHOOD_SIZE: usize = 20;

/// Rating predictors over a borrowed store. Similarities are recomputed per
/// call; there is no precomputed similarity matrix.
pub struct PredictionEngine<'a> {
    store: &'a RatingStore,
    similarity: SimilarityEngine<'a>,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(store: &'a RatingStore) -> Self {
        PredictionEngine {
            store,
            similarity: SimilarityEngine::new(store),
        }
    }

    /// Baseline estimate: the user's mean plus the average rating offset of
    /// everyone who rated the item. Falls back to the user's mean when the
    /// item has no raters (an item id never ingested counts as no raters).
    pub fn baseline_rating(&self, user_id: UserId, item_id: ItemId) -> Result<f64, UnknownUser> {
        let user = self.store.get_user(user_id).ok_or(UnknownUser(user_id))?;
        let user_mean = user.mean_rating();

        let raters = match self.store.get_item(item_id) {
            Some(item) if !item.rated_users().is_empty() => item.rated_users(),
            _ => return Ok(user_mean),
        };

        let offset_total: f64 = raters
            .iter()
            .filter_map(|&rater_id| self.store.get_user(rater_id))
            .map(|rater| rater.rating(item_id) - rater.mean_rating())
            .sum();

        Ok(user_mean + offset_total / raters.len() as f64)
    }

    /// Neighborhood-weighted estimate using mean-centered correlation.
    pub fn predict_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
        neighborhood_size_k: usize,
    ) -> Result<f64, UnknownUser> {
        self.predict_with_metric(Metric::Pearson, user_id, item_id, neighborhood_size_k)
    }

    /// Neighborhood-weighted estimate using cosine similarity.
    pub fn predict_cosine_rating(
        &self,
        user_id: UserId,
        item_id: ItemId,
        neighborhood_size_k: usize,
    ) -> Result<f64, UnknownUser> {
        self.predict_with_metric(Metric::Cosine, user_id, item_id, neighborhood_size_k)
    }

    pub fn predict_with_metric(
        &self,
        metric: Metric,
        user_id: UserId,
        item_id: ItemId,
        neighborhood_size_k: usize,
    ) -> Result<f64, UnknownUser> {
        // Unknown items signal the sentinel 0 before the user is looked up.
        let item = match self.store.get_item(item_id) {
            Some(item) => item,
            None => return Ok(0.0),
        };
        let user = self.store.get_user(user_id).ok_or(UnknownUser(user_id))?;

        // Every rater of the item is a candidate neighbor. The querying user
        // is NOT excluded; a self-match enters with its self-similarity.
        let mut top_neighbors = OctonaryHeap::<NeighborScore>::with_capacity(neighborhood_size_k);
        for &rater_id in item.rated_users().iter() {
            let score = match metric {
                Metric::Pearson => self.similarity.find_similarity(user_id, rater_id),
                Metric::Cosine => self.similarity.find_cosine_similarity(user_id, rater_id),
            };
            let candidate = NeighborScore::new(rater_id, score);

            if top_neighbors.len() < neighborhood_size_k {
                top_neighbors.push(candidate);
            } else if let Some(mut bottom) = top_neighbors.peek_mut() {
                if candidate < *bottom {
                    *bottom = candidate;
                }
            }
        }

        let user_mean = user.mean_rating();
        let mut weighted_deviation_sum = 0.0;
        let mut similarity_magnitude_sum = 0.0;
        for neighbor in top_neighbors.into_iter() {
            if let Some(rater) = self.store.get_user(neighbor.user_id) {
                weighted_deviation_sum +=
                    neighbor.score * (rater.rating(item_id) - rater.mean_rating());
                similarity_magnitude_sum += neighbor.score.abs();
            }
        }

        if similarity_magnitude_sum == 0.0 {
            return Ok(user_mean);
        }
        Ok(user_mean + weighted_deviation_sum / similarity_magnitude_sum)
    }
}
