use actix_web::{
    http::ContentEncoding, middleware, web, App, HttpRequest, HttpResponse, HttpServer,
};
use actix_web_prom::PrometheusMetrics;

use actix_web::http::header;
use std::path::Path;
use std::sync::Arc;

use nocturne::config::AppConfig;
use nocturne::datasetstats::{determine_rating_data_statistics, SharedHandlesAndConfig};
use nocturne::endpoints::index_resource::internal;
use nocturne::endpoints::predict_resource::v1_predict;
use nocturne::endpoints::recommend_resource::v1_recommend;
use nocturne::io;
use nocturne::userknn::rating_store::RatingStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let neighborhood_size_k = config.model.neighborhood_size_k;
    let num_items_to_recommend = config.model.num_items_to_recommend;
    let qty_workers = config.server.num_workers;

    let ratings_data_path = Path::new(&config.data.ratings_data_path);
    if !ratings_data_path.is_file() {
        panic!(
            "Ratings data file does not exist: {}",
            &config.data.ratings_data_path
        )
    }

    // Ingestion completes in full before the first request is served; the
    // store is immutable from here on.
    let ratings = io::read_ratings_data(&config.data.ratings_data_path, &config.data.delimiter);
    let data_stats =
        determine_rating_data_statistics(&config.data.ratings_data_path, &ratings);

    let mut store = RatingStore::new();
    for &(user_id, item_id, rating, _time) in ratings.iter() {
        store.ingest_rating(user_id, item_id, rating);
    }

    if !config.data.items_data_path.is_empty() {
        let items_data_path = Path::new(&config.data.items_data_path);
        if !items_data_path.is_file() {
            panic!(
                "Items data file does not exist: {}",
                &config.data.items_data_path
            )
        }
        let item_records =
            io::read_items_data(&config.data.items_data_path, &config.data.delimiter);
        println!("Loaded {} item records", item_records.len());
        for record in item_records.into_iter() {
            store.ingest_item_metadata(record.item_id, &record.title, record.year, record.categories);
        }
    }

    let store = Arc::new(store);
    let data_stats = Arc::new(data_stats);

    println!("start metrics");
    let prometheus = PrometheusMetrics::new("api", Some("/internal/prometheus"), None);

    println!("Done. start httpd at http://{}", &bind_address);
    HttpServer::new(move || {
        let handles_and_config = SharedHandlesAndConfig {
            rating_store: store.clone(),
            data_stats: data_stats.clone(),
            neighborhood_size_k,
            num_items_to_recommend,
            qty_workers,
        };

        App::new()
            .wrap(middleware::Compress::new(ContentEncoding::Identity))
            .wrap(prometheus.clone())
            .wrap(
                middleware::DefaultHeaders::new()
                    .header("Cache-Control", "no-cache, no-store, must-revalidate")
                    .header("Pragma", "no-cache")
                    .header("Expires", "0"),
            )
            .data(handles_and_config)
            .service(v1_predict)
            .service(v1_recommend)
            .service(internal)
            .service(web::resource("/").route(web::get().to(|_req: HttpRequest| {
                HttpResponse::Found()
                    .header(header::LOCATION, "/internal")
                    .finish()
            })))
    })
    .workers(config.server.num_workers)
    .bind(&bind_address)
    .unwrap_or_else(|_| panic!("Could not bind server to address {}", &bind_address))
    .run()
    .await
}
