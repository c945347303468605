use hashbrown::{HashMap, HashSet};

use crate::io::{ItemId, Rating, UserId};

/// A user and the ratings it supplied. Rating sums are maintained on every
/// mutation, so the derived mean and magnitude are always current.
pub struct User {
    user_id: UserId,
    ratings: HashMap<ItemId, Rating>,
    rating_sum: f64,
    squared_rating_sum: f64,
}

impl User {
    fn new(user_id: UserId) -> Self {
        User {
            user_id,
            ratings: HashMap::new(),
            rating_sum: 0.0,
            squared_rating_sum: 0.0,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    fn add_rating(&mut self, item_id: ItemId, rating: Rating) {
        if let Some(previous) = self.ratings.insert(item_id, rating) {
            self.rating_sum += rating - previous;
            self.squared_rating_sum += rating * rating - previous * previous;
        } else {
            self.rating_sum += rating;
            self.squared_rating_sum += rating * rating;
        }
    }

    pub fn is_rated(&self, item_id: ItemId) -> bool {
        self.ratings.contains_key(&item_id)
    }

    /// The rating this user gave `item_id`, 0 when the item was never rated.
    pub fn rating(&self, item_id: ItemId) -> Rating {
        self.ratings.get(&item_id).copied().unwrap_or(0.0)
    }

    pub fn rated_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ratings.keys().copied()
    }

    pub fn qty_ratings(&self) -> usize {
        self.ratings.len()
    }

    pub fn mean_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        self.rating_sum / self.ratings.len() as f64
    }

    /// Euclidean norm of the full rating vector.
    pub fn magnitude(&self) -> f64 {
        self.squared_rating_sum.sqrt()
    }
}

/// An item, its descriptive fields and the running mean of the ratings it
/// received.
pub struct Item {
    item_id: ItemId,
    title: String,
    year: Option<i32>,
    categories: HashSet<String>,
    mean_rating: f64,
    qty_ratings: usize,
    rated_users: HashSet<UserId>,
}

impl Item {
    fn with_defaults(item_id: ItemId) -> Self {
        Item {
            item_id,
            title: String::new(),
            year: None,
            categories: HashSet::new(),
            mean_rating: 0.0,
            qty_ratings: 0,
            rated_users: HashSet::new(),
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn categories(&self) -> &HashSet<String> {
        &self.categories
    }

    /// Running mean of all ratings this item received.
    pub fn baseline_rating(&self) -> f64 {
        self.mean_rating
    }

    pub fn qty_ratings(&self) -> usize {
        self.qty_ratings
    }

    pub fn rated_users(&self) -> &HashSet<UserId> {
        &self.rated_users
    }

    fn add_rating(&mut self, user_id: UserId, rating: Rating) {
        self.rated_users.insert(user_id);
        self.qty_ratings += 1;
        self.mean_rating += (rating - self.mean_rating) / self.qty_ratings as f64;
    }

    fn set_metadata(&mut self, title: &str, year: Option<i32>, categories: HashSet<String>) {
        self.title = title.to_string();
        self.year = year;
        self.categories = categories;
    }
}

/// Owns every User and Item plus the global running mean over all ingested
/// ratings. The engines borrow it and look entities up by id.
pub struct RatingStore {
    users: HashMap<UserId, User>,
    items: HashMap<ItemId, Item>,
    global_mean_rating: f64,
    qty_ratings: usize,
}

impl Default for RatingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingStore {
    pub fn new() -> RatingStore {
        RatingStore {
            users: HashMap::new(),
            items: HashMap::new(),
            global_mean_rating: 0.0,
            qty_ratings: 0,
        }
    }

    /// Records one rating tuple. The user map entry, the item statistics and
    /// the global running mean all reflect the tuple when this returns.
    pub fn ingest_rating(&mut self, user_id: UserId, item_id: ItemId, rating: Rating) {
        self.users
            .entry(user_id)
            .or_insert_with(|| User::new(user_id))
            .add_rating(item_id, rating);

        self.items
            .entry(item_id)
            .or_insert_with(|| Item::with_defaults(item_id))
            .add_rating(user_id, rating);

        self.qty_ratings += 1;
        self.global_mean_rating += (rating - self.global_mean_rating) / self.qty_ratings as f64;
    }

    /// Creates or overwrites an item's descriptive fields. Rating statistics
    /// are left untouched.
    pub fn ingest_item_metadata(
        &mut self,
        item_id: ItemId,
        title: &str,
        year: Option<i32>,
        categories: HashSet<String>,
    ) {
        self.items
            .entry(item_id)
            .or_insert_with(|| Item::with_defaults(item_id))
            .set_metadata(title, year, categories);
    }

    pub fn get_user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    pub fn get_item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.get(&item_id)
    }

    pub fn is_valid_item(&self, item_id: ItemId) -> bool {
        self.items.contains_key(&item_id)
    }

    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.keys().copied()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn qty_users(&self) -> usize {
        self.users.len()
    }

    pub fn qty_items(&self) -> usize {
        self.items.len()
    }

    pub fn qty_ratings(&self) -> usize {
        self.qty_ratings
    }

    pub fn global_mean_rating(&self) -> f64 {
        self.global_mean_rating
    }
}

#[cfg(test)]
mod rating_store_test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn should_create_user_and_item_on_first_rating() {
        let mut store = RatingStore::new();
        store.ingest_rating(1, 10, 4.0);

        let user = store.get_user(1).unwrap();
        assert_eq!(1, user.user_id());
        assert!(user.is_rated(10));
        assert_eq!(4.0, user.rating(10));

        let item = store.get_item(10).unwrap();
        assert_eq!(10, item.item_id());
        assert!(item.rated_users().contains(&1));
        assert!(store.is_valid_item(10));
        assert!(!store.is_valid_item(11));
    }

    #[test]
    fn should_update_item_running_mean_incrementally() {
        let mut store = RatingStore::new();
        store.ingest_rating(1, 10, 4.0);
        assert_eq!(4.0, store.get_item(10).unwrap().baseline_rating());

        store.ingest_rating(2, 10, 2.0);
        let item = store.get_item(10).unwrap();
        assert_eq!(2, item.qty_ratings());
        assert_eq!(3.0, item.baseline_rating());
    }

    #[test]
    fn should_update_global_running_mean() {
        let mut store = RatingStore::new();
        store.ingest_rating(1, 10, 5.0);
        store.ingest_rating(1, 20, 3.0);
        store.ingest_rating(2, 10, 1.0);

        assert_eq!(3, store.qty_ratings());
        assert!(approx_eq!(f64, 3.0, store.global_mean_rating(), ulps = 2));
    }

    #[test]
    fn should_derive_user_mean_and_magnitude() {
        let mut store = RatingStore::new();
        store.ingest_rating(7, 10, 3.0);
        store.ingest_rating(7, 20, 4.0);

        let user = store.get_user(7).unwrap();
        assert_eq!(2, user.qty_ratings());
        assert!(approx_eq!(f64, 3.5, user.mean_rating(), ulps = 2));
        assert!(approx_eq!(f64, 5.0, user.magnitude(), ulps = 2));
    }

    #[test]
    fn should_reflect_later_ratings_in_user_mean() {
        // The mean is derived from maintained sums on every read, so a
        // rating ingested after an earlier read shows up in the next read.
        let mut store = RatingStore::new();
        store.ingest_rating(7, 10, 4.0);
        assert_eq!(4.0, store.get_user(7).unwrap().mean_rating());

        store.ingest_rating(7, 20, 2.0);
        assert_eq!(3.0, store.get_user(7).unwrap().mean_rating());
    }

    #[test]
    fn should_replace_rating_for_the_same_item() {
        let mut store = RatingStore::new();
        store.ingest_rating(7, 10, 4.0);
        store.ingest_rating(7, 10, 2.0);

        // The user keeps a single map entry per item.
        let user = store.get_user(7).unwrap();
        assert_eq!(1, user.qty_ratings());
        assert_eq!(2.0, user.rating(10));
        assert_eq!(2.0, user.mean_rating());
        assert_eq!(2.0, user.magnitude());

        // Item and global counts tick on every ingested tuple; deduplication
        // is the importer's responsibility.
        let item = store.get_item(10).unwrap();
        assert_eq!(2, item.qty_ratings());
        assert_eq!(3.0, item.baseline_rating());
        assert_eq!(2, store.qty_ratings());
    }

    #[test]
    fn should_overwrite_metadata_without_touching_statistics() {
        let mut store = RatingStore::new();
        store.ingest_rating(1, 10, 4.0);
        store.ingest_rating(2, 10, 2.0);

        let mut categories = HashSet::new();
        categories.insert("Comedy".to_string());
        store.ingest_item_metadata(10, "Toy Story", Some(1995), categories);

        let item = store.get_item(10).unwrap();
        assert_eq!("Toy Story", item.title());
        assert_eq!(Some(1995), item.year());
        assert!(item.categories().contains("Comedy"));
        assert_eq!(2, item.qty_ratings());
        assert_eq!(3.0, item.baseline_rating());

        // Overwriting keeps statistics intact as well.
        store.ingest_item_metadata(10, "Toy Story (remaster)", Some(1995), HashSet::new());
        let item = store.get_item(10).unwrap();
        assert_eq!("Toy Story (remaster)", item.title());
        assert_eq!(3.0, item.baseline_rating());
    }

    #[test]
    fn should_create_item_from_metadata_alone() {
        let mut store = RatingStore::new();
        store.ingest_item_metadata(99, "Theremin", None, HashSet::new());

        let item = store.get_item(99).unwrap();
        assert_eq!(0, item.qty_ratings());
        assert!(item.rated_users().is_empty());
        assert!(store.is_valid_item(99));
    }

    #[test]
    fn should_signal_absence_on_lookups() {
        let store = RatingStore::new();
        assert!(store.get_user(1).is_none());
        assert!(store.get_item(1).is_none());
        assert_eq!(0, store.qty_users());
        assert_eq!(0, store.qty_items());
    }
}
