// src/handlers/dashboard.rs
use log::{debug, error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::dashboard::{build, DashboardQuery};
use crate::services::products::ProductsService;

pub async fn post_dashboard(
    service: Arc<ProductsService>,
    query: DashboardQuery,
) -> Result<Json, Rejection> {
    info!("Handling dashboard request: {:?}", query);

    let params = query
        .fetch_params()
        .map_err(|e| warp::reject::custom(ApiError::bad_request(e.to_string())))?;

    let records = service.load(&params).await.map_err(|e| {
        error!("Failed to fetch products for {:?}: {:#}", params, e);
        warp::reject::custom(ApiError::upstream(format!("Failed to fetch products: {}", e)))
    })?;
    debug!("Loaded {} records for {:?}", records.len(), params);

    let dashboard = build(&records, &query).map_err(|e| {
        error!("Failed to build dashboard: {}", e);
        warp::reject::custom(ApiError::internal(e.to_string()))
    })?;

    Ok(warp::reply::json(&dashboard))
}
