// src/routes.rs
use log::{error, info};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{
    InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge, Rejection,
    UnsupportedMediaType,
};
use warp::{Filter, Reply};

use crate::handlers::dashboard::post_dashboard;
use crate::handlers::error::ApiError;
use crate::handlers::pages::get_pages;
use crate::handlers::raw_data::{
    get_raw_data_options, post_raw_data, post_raw_data_csv, ExportQuery,
};
use crate::services::dashboard::DashboardQuery;
use crate::services::filters::RawDataFilter;
use crate::services::products::ProductsService;

const MAX_BODY_BYTES: u64 = 64 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status();
        message = api_error.message.clone();
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else if let Some(e) = err.find::<InvalidQuery>() {
        code = StatusCode::BAD_REQUEST;
        message = e.to_string();
    } else if let Some(e) = err.find::<PayloadTooLarge>() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = e.to_string();
    } else if let Some(e) = err.find::<UnsupportedMediaType>() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = e.to_string();
    } else if let Some(e) = err.find::<LengthRequired>() {
        code = StatusCode::LENGTH_REQUIRED;
        message = e.to_string();
    } else if err.find::<MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        error!("Unhandled rejection: {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn routes(
    service: Arc<ProductsService>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let service_filter = warp::any().map(move || service.clone());

    let pages_route = warp::path!("api" / "v1" / "pages")
        .and(warp::get())
        .and_then(get_pages);

    let raw_options_route = warp::path!("api" / "v1" / "raw-data" / "options")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_raw_data_options);

    let raw_data_route = warp::path!("api" / "v1" / "raw-data")
        .and(warp::post())
        .and(service_filter.clone())
        .and(json_body::<RawDataFilter>())
        .and_then(post_raw_data);

    let raw_csv_route = warp::path!("api" / "v1" / "raw-data" / "csv")
        .and(warp::post())
        .and(service_filter.clone())
        .and(warp::query::<ExportQuery>())
        .and(json_body::<RawDataFilter>())
        .and_then(post_raw_data_csv);

    let dashboard_route = warp::path!("api" / "v1" / "dashboard")
        .and(warp::post())
        .and(service_filter.clone())
        .and(json_body::<DashboardQuery>())
        .and_then(post_dashboard);

    info!("All routes configured successfully.");

    pages_route
        .or(raw_options_route)
        .or(raw_data_route)
        .or(raw_csv_route)
        .or(dashboard_route)
        .recover(handle_rejection)
}
