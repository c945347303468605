#[macro_use]
extern crate bencher;
extern crate rand;

use bencher::Bencher;
use rand::Rng;

use nocturne::userknn::prediction::PredictionEngine;
use nocturne::userknn::rating_store::RatingStore;
use nocturne::userknn::similarity::SimilarityEngine;

benchmark_group!(benches, pearson_similarity, cosine_similarity, neighborhood_prediction);
benchmark_main!(benches);

const QTY_USERS: u32 = 500;
const QTY_ITEMS: u64 = 200;
const RATINGS_PER_USER: usize = 40;

fn synthetic_store() -> RatingStore {
    let mut rng = rand::thread_rng();
    let mut store = RatingStore::new();
    for user_id in 0..QTY_USERS {
        for _ in 0..RATINGS_PER_USER {
            let item_id = rng.gen_range(0..QTY_ITEMS);
            let rating = rng.gen_range(1..=5) as f64;
            store.ingest_rating(user_id, item_id, rating);
        }
    }
    store
}

fn pearson_similarity(bench: &mut Bencher) {
    let store = synthetic_store();
    let engine = SimilarityEngine::new(&store);
    let mut rng = rand::thread_rng();
    bench.iter(|| {
        let user_id1 = rng.gen_range(0..QTY_USERS);
        let user_id2 = rng.gen_range(0..QTY_USERS);
        bencher::black_box(engine.find_similarity(user_id1, user_id2));
    })
}

fn cosine_similarity(bench: &mut Bencher) {
    let store = synthetic_store();
    let engine = SimilarityEngine::new(&store);
    let mut rng = rand::thread_rng();
    bench.iter(|| {
        let user_id1 = rng.gen_range(0..QTY_USERS);
        let user_id2 = rng.gen_range(0..QTY_USERS);
        bencher::black_box(engine.find_cosine_similarity(user_id1, user_id2));
    })
}

fn neighborhood_prediction(bench: &mut Bencher) {
    let store = synthetic_store();
    let engine = PredictionEngine::new(&store);
    let mut rng = rand::thread_rng();
    bench.iter(|| {
        let user_id = rng.gen_range(0..QTY_USERS);
        let item_id = rng.gen_range(0..QTY_ITEMS);
        bencher::black_box(engine.predict_rating(user_id, item_id, 20).unwrap());
    })
}
