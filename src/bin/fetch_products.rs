// src/bin/fetch_products.rs
use log::{error, info};
use reqwest::Client;

use sales_dashboard::config::AppConfig;
use sales_dashboard::models::Region;
use sales_dashboard::services::aggregations::{revenue_by_location, totals};
use sales_dashboard::services::presenter::{format_number, CURRENCY_PREFIX};
use sales_dashboard::services::products::{fetch_products, FetchParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = AppConfig::from_env()?;
    let client = Client::new();

    info!("Testing products fetch from {}", config.products_url);

    for params in [FetchParams::default(), FetchParams::dashboard(Region::Sul, Some(2022))] {
        match fetch_products(&client, &config.products_url, &params).await {
            Ok(records) => {
                let t = totals(&records);
                info!(
                    "SUCCESS {:?}: {} records, revenue {}",
                    params,
                    records.len(),
                    format_number(t.revenue, CURRENCY_PREFIX)
                );
                if let Some(top) = revenue_by_location(&records).first() {
                    info!("Top location: {} ({})", top.location, format_number(top.stats.revenue, CURRENCY_PREFIX));
                }
            }
            Err(e) => {
                error!("ERROR: Failed to fetch products for {:?}: {:#}", params, e);
                return Err(e);
            }
        }
    }

    Ok(())
}
