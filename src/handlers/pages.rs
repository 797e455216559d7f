// src/handlers/pages.rs
use log::info;
use warp::reply::Json;
use warp::Rejection;

use crate::services::presenter::Navigation;

pub async fn get_pages() -> Result<Json, Rejection> {
    info!("Handling request for page navigation");
    Ok(warp::reply::json(&Navigation::new()))
}
