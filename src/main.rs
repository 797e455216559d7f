use log::{error, info};
use std::process;
use std::sync::Arc;
use warp::Filter;

use sales_dashboard::config::AppConfig;
use sales_dashboard::routes;
use sales_dashboard::services::products::ProductsService;

#[tokio::main]
async fn main() {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            process::exit(1);
        }
    };

    let service = Arc::new(ProductsService::from_config(&config));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(service).with(cors);
    info!("Routes configured successfully with CORS.");

    let addr = config.socket_addr();
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
