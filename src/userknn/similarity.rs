use crate::io::{ItemId, UserId};
use crate::userknn::rating_store::{RatingStore, User};

/// Pairwise user similarity over the items both users rated. All lookups go
/// through the borrowed store; an unknown user on either side scores 0.
pub struct SimilarityEngine<'a> {
    store: &'a RatingStore,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(store: &'a RatingStore) -> Self {
        SimilarityEngine { store }
    }

    /// Mean-centered correlation between two users' ratings on their common
    /// items. 0 for an empty intersection or when either side has zero
    /// variance on the intersection.
    pub fn find_similarity(&self, user_id1: UserId, user_id2: UserId) -> f64 {
        let (user1, user2) = match (self.store.get_user(user_id1), self.store.get_user(user_id2)) {
            (Some(user1), Some(user2)) => (user1, user2),
            _ => return 0.0,
        };

        let common_items = common_items(user1, user2);
        if common_items.is_empty() {
            return 0.0;
        }

        let mean1 = user1.mean_rating();
        let mean2 = user2.mean_rating();

        let mut dot_of_deviations = 0.0;
        let mut squared_deviations1 = 0.0;
        let mut squared_deviations2 = 0.0;
        for item_id in common_items {
            let deviation1 = user1.rating(item_id) - mean1;
            let deviation2 = user2.rating(item_id) - mean2;
            dot_of_deviations += deviation1 * deviation2;
            squared_deviations1 += deviation1 * deviation1;
            squared_deviations2 += deviation2 * deviation2;
        }

        if squared_deviations1 * squared_deviations2 == 0.0 {
            return 0.0;
        }
        dot_of_deviations / (squared_deviations1.sqrt() * squared_deviations2.sqrt())
    }

    /// Cosine similarity with the dot product restricted to common items but
    /// the denominator built from the FULL rating-vector magnitudes. The
    /// asymmetry is intentional; the weighted predictors are calibrated
    /// against these exact scores.
    pub fn find_cosine_similarity(&self, user_id1: UserId, user_id2: UserId) -> f64 {
        let (user1, user2) = match (self.store.get_user(user_id1), self.store.get_user(user_id2)) {
            (Some(user1), Some(user2)) => (user1, user2),
            _ => return 0.0,
        };

        let magnitude1 = user1.magnitude();
        let magnitude2 = user2.magnitude();
        if magnitude1 == 0.0 || magnitude2 == 0.0 {
            return 0.0;
        }

        let common_items = common_items(user1, user2);
        if common_items.is_empty() {
            return 0.0;
        }

        let mut dot_product = 0.0;
        for item_id in common_items {
            dot_product += user1.rating(item_id) * user2.rating(item_id);
        }

        dot_product / (magnitude1 * magnitude2)
    }
}

fn common_items(user1: &User, user2: &User) -> Vec<ItemId> {
    // scan the smaller rating map
    let (fewer, more) = if user1.qty_ratings() <= user2.qty_ratings() {
        (user1, user2)
    } else {
        (user2, user1)
    };
    fewer
        .rated_items()
        .filter(|&item_id| more.is_rated(item_id))
        .collect()
}
