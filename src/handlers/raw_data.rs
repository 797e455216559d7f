// src/handlers/raw_data.rs
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{header, Response};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{Cell, Column, SaleRecord};
use crate::services::csv_export::{export_filename, to_csv};
use crate::services::filters::{apply, FilterOptions, RawDataFilter};
use crate::services::presenter::shape_caption;
use crate::services::products::{FetchParams, ProductsService};

#[derive(Debug, Serialize)]
struct RawDataResponse {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
    row_count: usize,
    column_count: usize,
    caption: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub filename: Option<String>,
}

async fn load_all(service: &ProductsService) -> Result<Arc<Vec<SaleRecord>>, Rejection> {
    service.load(&FetchParams::default()).await.map_err(|e| {
        error!("Failed to fetch products: {:#}", e);
        warp::reject::custom(ApiError::upstream(format!("Failed to fetch products: {}", e)))
    })
}

pub async fn get_raw_data_options(service: Arc<ProductsService>) -> Result<Json, Rejection> {
    info!("Handling request for raw data filter options");
    let records = load_all(&service).await?;
    Ok(warp::reply::json(&FilterOptions::observe(&records)))
}

pub async fn post_raw_data(
    service: Arc<ProductsService>,
    filter: RawDataFilter,
) -> Result<Json, Rejection> {
    info!("Handling raw data request");
    let records = load_all(&service).await?;
    let table = apply(&records, &filter);
    let (row_count, column_count) = table.shape();

    Ok(warp::reply::json(&RawDataResponse {
        columns: table.columns,
        rows: table.rows,
        row_count,
        column_count,
        caption: shape_caption(row_count, column_count),
    }))
}

pub async fn post_raw_data_csv(
    service: Arc<ProductsService>,
    query: ExportQuery,
    filter: RawDataFilter,
) -> Result<Response<Vec<u8>>, Rejection> {
    let filename = export_filename(query.filename.as_deref());
    info!("Handling CSV export as {}", filename);

    let records = load_all(&service).await?;
    let table = apply(&records, &filter);
    let body = to_csv(&table).map_err(|e| {
        error!("Failed to encode CSV: {}", e);
        warp::reject::custom(ApiError::internal(e.to_string()))
    })?;

    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename.replace('"', "")),
        )
        .body(body)
        .map_err(|e| warp::reject::custom(ApiError::internal(e.to_string())))
}
