use std::collections::BinaryHeap;

use crate::io::{ItemId, UserId};
use crate::userknn::prediction::PredictionEngine;
use crate::userknn::rating_store::RatingStore;
use crate::userknn::{RankedItem, UnknownUser};

/// Ranks all items a user has not rated by their predicted rating.
pub struct Recommender<'a> {
    store: &'a RatingStore,
    prediction: PredictionEngine<'a>,
}

impl<'a> Recommender<'a> {
    pub fn new(store: &'a RatingStore) -> Self {
        Recommender {
            store,
            prediction: PredictionEngine::new(store),
        }
    }

    /// Returns at most `num_items` unseen item ids, best predicted score
    /// first. Equal scores rank the smaller item id first, so the result
    /// does not depend on map iteration order.
    pub fn recommend_items(
        &self,
        user_id: UserId,
        num_items: usize,
        num_neighbors: usize,
    ) -> Result<Vec<ItemId>, UnknownUser> {
        let user = self.store.get_user(user_id).ok_or(UnknownUser(user_id))?;

        let mut top_items: BinaryHeap<RankedItem> = BinaryHeap::with_capacity(num_items);
        for item_id in self.store.item_ids() {
            if user.is_rated(item_id) {
                continue;
            }
            let score = self
                .prediction
                .predict_rating(user_id, item_id, num_neighbors)?;
            let ranked = RankedItem::new(item_id, score);

            if top_items.len() < num_items {
                top_items.push(ranked);
            } else if let Some(mut bottom) = top_items.peek_mut() {
                if ranked < *bottom {
                    *bottom = ranked;
                }
            }
        }

        Ok(top_items
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.item_id)
            .collect())
    }
}
