use hashbrown::HashSet;
use rayon::iter::ParallelBridge;
use rayon::prelude::ParallelIterator;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::userknn::rating_store::RatingStore;

pub type UserId = u32;
pub type ItemId = u64;
pub type Rating = f64;
pub type Time = usize;

/// One descriptive record from an item file, rating statistics excluded.
pub struct ItemRecord {
    pub item_id: ItemId,
    pub title: String,
    pub year: Option<i32>,
    pub categories: HashSet<String>,
}

pub fn read_ratings_data(
    ratings_data_path: &str,
    delimiter: &str,
) -> Vec<(UserId, ItemId, Rating, Time)> {
    let line_iterator = create_buffered_line_reader(ratings_data_path).unwrap();
    // Malformed lines (including a csv header) fail to parse and are dropped.
    line_iterator
        .par_bridge()
        .filter_map(|result| {
            result
                .ok()
                .and_then(|rawline| parse_rating_line(&rawline, delimiter))
        })
        .collect()
}

pub fn read_items_data(items_data_path: &str, delimiter: &str) -> Vec<ItemRecord> {
    let line_iterator = create_buffered_line_reader(items_data_path).unwrap();
    line_iterator
        .par_bridge()
        .filter_map(|result| {
            result
                .ok()
                .and_then(|rawline| parse_item_line(&rawline, delimiter))
        })
        .collect()
}

fn create_buffered_line_reader<P>(filename: P) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

pub fn parse_rating_line(rawline: &str, delimiter: &str) -> Option<(UserId, ItemId, Rating, Time)> {
    let parts = rawline.split(delimiter).collect::<Vec<_>>();
    if parts.len() != 4 {
        return None;
    }
    let user_id = parts[0].trim().parse::<UserId>().ok()?;
    let item_id = parts[1].trim().parse::<ItemId>().ok()?;
    let rating = parts[2].trim().parse::<Rating>().ok()?;
    let time = parts[3].trim().parse::<f64>().ok()?.round() as Time;
    Some((user_id, item_id, rating, time))
}

pub fn parse_item_line(rawline: &str, delimiter: &str) -> Option<ItemRecord> {
    let parts = rawline.split(delimiter).collect::<Vec<_>>();
    if parts.len() == 3 {
        let item_id = parts[0].trim().parse::<ItemId>().ok()?;
        let (title, year) = split_title_year(parts[1]);
        let categories = split_categories(parts[2]);
        return Some(ItemRecord {
            item_id,
            title,
            year,
            categories,
        });
    }

    // Titles containing the delimiter are quoted, e.g. 11,"American President, The (1995)",Comedy
    let parts = rawline.split('"').collect::<Vec<_>>();
    if parts.len() == 3 {
        let item_id = parts[0]
            .trim_end_matches(delimiter)
            .trim()
            .parse::<ItemId>()
            .ok()?;
        let (title, year) = split_title_year(parts[1]);
        let categories = split_categories(parts[2].trim_start_matches(delimiter));
        return Some(ItemRecord {
            item_id,
            title,
            year,
            categories,
        });
    }

    None
}

/// Splits a raw title of the form "Toy Story (1995)" into the title proper
/// and its release year. Titles without a parseable trailing year are kept
/// whole.
fn split_title_year(raw_title: &str) -> (String, Option<i32>) {
    let raw_title = raw_title.trim();
    if raw_title.len() >= 6 && raw_title.ends_with(')') {
        let head = raw_title.get(..raw_title.len() - 6);
        let paren = raw_title.get(raw_title.len() - 6..raw_title.len() - 5);
        let digits = raw_title.get(raw_title.len() - 5..raw_title.len() - 1);
        if let (Some(head), Some("("), Some(digits)) = (head, paren, digits) {
            if let Ok(year) = digits.parse::<i32>() {
                return (head.trim().to_string(), Some(year));
            }
        }
    }
    (raw_title.to_string(), None)
}

fn split_categories(raw_categories: &str) -> HashSet<String> {
    raw_categories
        .trim()
        .split('|')
        .filter(|category| !category.is_empty())
        .map(|category| category.to_string())
        .collect()
}

pub struct ImportSummary {
    pub qty_ratings: usize,
    pub qty_new_users: usize,
}

/// Applies rating and item files to a RatingStore. A file that was already
/// imported through this importer is refused, so feeding the same file twice
/// leaves the store statistics unchanged.
pub struct DatasetImporter {
    imported_files: HashSet<String>,
}

impl Default for DatasetImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetImporter {
    pub fn new() -> DatasetImporter {
        DatasetImporter {
            imported_files: HashSet::new(),
        }
    }

    pub fn import_ratings(
        &mut self,
        store: &mut RatingStore,
        ratings_data_path: &str,
        delimiter: &str,
    ) -> ImportSummary {
        if !self.imported_files.insert(ratings_data_path.to_string()) {
            println!("{} is already imported, skipping.", ratings_data_path);
            return ImportSummary {
                qty_ratings: 0,
                qty_new_users: 0,
            };
        }

        let records = read_ratings_data(ratings_data_path, delimiter);
        let qty_users_before = store.qty_users();
        for &(user_id, item_id, rating, _time) in records.iter() {
            store.ingest_rating(user_id, item_id, rating);
        }

        ImportSummary {
            qty_ratings: records.len(),
            qty_new_users: store.qty_users() - qty_users_before,
        }
    }

    pub fn import_items(
        &mut self,
        store: &mut RatingStore,
        items_data_path: &str,
        delimiter: &str,
    ) -> usize {
        if !self.imported_files.insert(items_data_path.to_string()) {
            println!("{} is already imported, skipping.", items_data_path);
            return 0;
        }

        let records = read_items_data(items_data_path, delimiter);
        for record in records.iter() {
            store.ingest_item_metadata(
                record.item_id,
                &record.title,
                record.year,
                record.categories.clone(),
            );
        }
        records.len()
    }
}
