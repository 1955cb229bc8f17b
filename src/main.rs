mod config;
mod db;
mod errors;
mod handlers;
mod middlewares;
mod models;
mod routes;
mod services;
mod state;
mod structs;
#[cfg(test)]
mod test_support;
mod utils;

use std::sync::Arc;

use crate::config::app_config::AppConfig;
use crate::db::mongo_store::MongoQrCodeStore;
use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use db::mongodb::get_database;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use routes::init_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    // A missing base URL would print dead links into every dynamic code
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let db = match get_database(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Error connecting to the database: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = MongoQrCodeStore::new(db);
    if let Err(e) = store.ensure_indexes().await {
        error!("Failed to create indexes: {}", e);
        std::process::exit(1);
    }

    let bind = (config.bind_address.clone(), config.port);
    let cors_origins = config.cors_origins.clone();
    info!(
        "Serving short links under {}/r/ on {}:{}",
        config.base_url, bind.0, bind.1
    );

    let app_state = web::Data::new(AppState::new(Arc::new(store), config));

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind(bind)?
    .run()
    .await
}
