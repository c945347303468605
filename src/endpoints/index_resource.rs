extern crate sys_info;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::datasetstats::SharedHandlesAndConfig;
use web::Data;

#[get("/internal")]
pub async fn internal(config: Data<SharedHandlesAndConfig>) -> HttpResponse {
    let mut html = "<html>nocturne: user-based collaborative filtering recommendations.<br />"
        .to_string();

    let data_stats = &config.data_stats;
    html.push_str("<h3>Rating data</h3>");
    html.push_str("Loaded: ");
    html.push_str(&*data_stats.descriptive_name);
    html.push_str("<br />Qty Ratings: ");
    html.push_str(&*data_stats.qty_ratings.to_string());
    html.push_str("<br />Qty Unique UserIds: ");
    html.push_str(&*data_stats.qty_unique_user_ids.to_string());
    html.push_str("<br />Qty Unique ItemIds: ");
    html.push_str(&*data_stats.qty_unique_item_ids.to_string());
    html.push_str("<br />Global mean rating: ");
    html.push_str(&*format!("{:.4}", config.rating_store.global_mean_rating()));
    html.push_str("<br />Min Date Time: ");
    html.push_str(&data_stats.min_time_date_time.to_string());
    html.push_str("<br />Max Date Time: ");
    html.push_str(&data_stats.max_time_date_time.to_string());
    html.push_str("<br />Age (hours): ");

    let age_hours = (Utc::now().naive_utc() - data_stats.max_time_date_time).num_hours();

    html.push_str(&*age_hours.to_string());
    html.push_str("<br />Ratings per user percentiles: ");
    html.push_str(" p50=");
    html.push_str(&data_stats.ratings_per_user_p50.to_string());
    html.push_str(" p90=");
    html.push_str(&data_stats.ratings_per_user_p90.to_string());
    html.push_str(" p100=");
    html.push_str(&data_stats.ratings_per_user_p100.to_string());

    html.push_str("<h3>Models</h3>");
    html.push_str("hyperparameters");
    html.push_str("<br />k : ");
    html.push_str(&config.neighborhood_size_k.to_string());
    html.push_str(" (top `k` most similar raters per prediction)");
    html.push_str("<br />Qty items to recommend: ");
    html.push_str(&config.num_items_to_recommend.to_string());
    html.push_str(
        "<br /><a href=\"/v1/recommend?user_id=1&how_many=10\">v1 recommend endpoint</a>",
    );
    html.push_str(
        "<br /><a href=\"/v1/predict?user_id=1&item_id=1&metric=pearson\">v1 predict endpoint</a>",
    );
    html.push_str("<h3>Machine instance</h3>");
    html.push_str("<br />Qty CPU's detected: ");
    html.push_str(&*sys_info::cpu_num().unwrap_or(0).to_string());
    html.push_str("<br />Qty actix workers set: ");
    html.push_str(&config.qty_workers.to_string());
    html.push_str("<br />CPU speed: ");
    html.push_str(&*sys_info::cpu_speed().unwrap_or(0).to_string());
    html.push_str("MHz");
    html.push_str("<br />Active processes on instance: ");
    html.push_str(&*sys_info::proc_total().unwrap_or(0).to_string());
    html.push_str("<h3>Metrics</h3>");
    html.push_str("<a href=\"/internal/prometheus\">prometheus</a>");
    html.push_str("</html>");

    HttpResponse::Ok().body(html)
}
