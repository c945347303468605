use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

use serde::Deserialize;

use crate::io::{ItemId, UserId};

pub mod prediction;
pub mod rating_store;
pub mod recommend;
pub mod similarity;

/// Similarity metric driving the neighborhood-weighted predictors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Pearson,
    Cosine,
}

/// Requests for a user id that was never ingested fail with this error
/// instead of dereferencing a missing pool entry.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownUser(pub UserId);

impl fmt::Display for UnknownUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown user id {}", self.0)
    }
}

impl Error for UnknownUser {}

#[derive(PartialEq, Debug)]
pub struct NeighborScore {
    pub user_id: UserId,
    pub score: f64,
}

impl NeighborScore {
    fn new(user_id: UserId, score: f64) -> Self {
        NeighborScore { user_id, score }
    }
}

impl Eq for NeighborScore {}

impl Ord for NeighborScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score, equal scores keep the smaller user id
        match other.score.partial_cmp(&self.score) {
            Some(Ordering::Equal) | None => self.user_id.cmp(&other.user_id),
            Some(ordering) => ordering,
        }
    }
}

impl PartialOrd for NeighborScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(PartialEq, Debug)]
pub struct RankedItem {
    pub item_id: ItemId,
    pub score: f64,
}

impl RankedItem {
    fn new(item_id: ItemId, score: f64) -> Self {
        RankedItem { item_id, score }
    }
}

impl Eq for RankedItem {}

impl Ord for RankedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score, equal scores keep the smaller item id
        match other.score.partial_cmp(&self.score) {
            Some(Ordering::Equal) | None => self.item_id.cmp(&other.item_id),
            Some(ordering) => ordering,
        }
    }
}

impl PartialOrd for RankedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod ordering_test {
    use std::collections::BinaryHeap;

    use super::*;
    use dary_heap::OctonaryHeap;

    #[test]
    fn handle_reverse_ordering_rankeditem() {
        let largest = RankedItem::new(123, 5000 as f64);
        let middle = RankedItem::new(234, 100 as f64);
        let smallest = RankedItem::new(543, 1 as f64);
        let items = vec![largest, smallest, middle];

        let how_many = 2;
        let mut top_items: BinaryHeap<RankedItem> = BinaryHeap::with_capacity(how_many);

        for ranked in items.into_iter() {
            if top_items.len() < how_many {
                top_items.push(ranked);
            } else {
                let mut reverse_top = top_items.peek_mut().unwrap();
                if ranked < *reverse_top {
                    *reverse_top = ranked;
                }
            }
        }
        // the results are the top `how_many` in reverse order
        assert_eq!(234, top_items.pop().unwrap().item_id);
        assert_eq!(123, top_items.pop().unwrap().item_id);
    }

    #[test]
    fn handle_vector_sort_ordering_rankeditem() {
        let mut ranking: BinaryHeap<RankedItem> = BinaryHeap::new();
        ranking.push(RankedItem::new(123, 5000 as f64));
        ranking.push(RankedItem::new(543, 1 as f64));
        ranking.push(RankedItem::new(234, 100 as f64));

        let ranked_items: Vec<u64> = ranking
            .into_sorted_vec()
            .iter()
            .map(|ranked| ranked.item_id)
            .collect();
        let expected_items: Vec<u64> = vec![123, 234, 543];
        assert_eq!(expected_items, ranked_items);
    }

    #[test]
    fn should_break_equal_scores_by_ascending_item_id() {
        let mut ranking: BinaryHeap<RankedItem> = BinaryHeap::new();
        ranking.push(RankedItem::new(77, 3.5));
        ranking.push(RankedItem::new(12, 3.5));
        ranking.push(RankedItem::new(40, 3.5));

        let ranked_items: Vec<u64> = ranking
            .into_sorted_vec()
            .iter()
            .map(|ranked| ranked.item_id)
            .collect();
        assert_eq!(vec![12, 40, 77], ranked_items);
    }

    #[test]
    fn handle_reverse_ordering_neighborscore() {
        let largest = NeighborScore::new(123, 0.9);
        let middle = NeighborScore::new(234, 0.5);
        let smallest = NeighborScore::new(543, -0.3);
        let neighbors = vec![largest, smallest, middle];

        let how_many = 2;
        let mut top_neighbors = OctonaryHeap::<NeighborScore>::with_capacity(how_many);

        for neighbor in neighbors.into_iter() {
            if top_neighbors.len() < how_many {
                top_neighbors.push(neighbor);
            } else {
                let mut reverse_top = top_neighbors.peek_mut().unwrap();
                if neighbor < *reverse_top {
                    *reverse_top = neighbor;
                }
            }
        }
        // the results are the top `how_many` in reverse order
        assert_eq!(234, top_neighbors.pop().unwrap().user_id);
        assert_eq!(123, top_neighbors.pop().unwrap().user_id);
    }

    #[test]
    fn should_break_equal_similarities_by_ascending_user_id() {
        let first = NeighborScore::new(9, 1.0);
        let second = NeighborScore::new(3, 1.0);
        // the smaller user id wins an equal-similarity comparison
        assert!(second < first);
    }
}
