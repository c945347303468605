use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::datasetstats::SharedHandlesAndConfig;
use crate::io::{ItemId, UserId};
use crate::userknn::prediction::PredictionEngine;
use crate::userknn::Metric;

#[derive(Debug, Deserialize)]
pub struct V1PredictQueryParams {
    user_id: UserId,
    item_id: ItemId,
    metric: Option<Metric>,
    k: Option<usize>,
}

// Predicted rating of one (user, item) pair. An item id that was never
// ingested yields the sentinel score 0; the /internal page documents the
// loaded item universe for callers that need to tell the two apart.
#[get("/v1/predict")]
pub async fn v1_predict(
    data: web::Data<SharedHandlesAndConfig>,
    query: web::Query<V1PredictQueryParams>,
) -> HttpResponse {
    let metric = query.metric.unwrap_or(Metric::Pearson);
    let neighborhood_size_k = query.k.unwrap_or(data.neighborhood_size_k);

    let engine = PredictionEngine::new(data.rating_store.as_ref());
    match engine.predict_with_metric(metric, query.user_id, query.item_id, neighborhood_size_k) {
        Ok(score) => HttpResponse::Ok().json(score),
        Err(unknown_user) => HttpResponse::NotFound().body(unknown_user.to_string()),
    }
}
