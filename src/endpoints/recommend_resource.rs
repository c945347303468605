use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::datasetstats::SharedHandlesAndConfig;
use crate::io::{ItemId, UserId};
use crate::userknn::recommend::Recommender;

#[derive(Debug, Deserialize)]
pub struct V1RecommendQueryParams {
    user_id: UserId,
    how_many: Option<usize>,
    k: Option<usize>,
}

// Nocturne's main endpoint: the top unseen items for a known user, best
// predicted rating first.
#[get("/v1/recommend")]
pub async fn v1_recommend(
    data: web::Data<SharedHandlesAndConfig>,
    query: web::Query<V1RecommendQueryParams>,
) -> HttpResponse {
    let how_many = query.how_many.unwrap_or(data.num_items_to_recommend);
    let neighborhood_size_k = query.k.unwrap_or(data.neighborhood_size_k);

    let recommender = Recommender::new(data.rating_store.as_ref());
    match recommender.recommend_items(query.user_id, how_many, neighborhood_size_k) {
        Ok(recommended_items) => HttpResponse::Ok().json(recommended_items),
        Err(unknown_user) => HttpResponse::NotFound().body(unknown_user.to_string()),
    }
}
