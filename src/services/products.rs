// src/services/products.rs
use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::models::{Region, SaleRecord};

/// Query scope of one products request.
///
/// The raw data page fetches with no parameters at all. The dashboard always
/// sends both `regiao` and `ano`, leaving either empty to mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub region: Option<Region>,
    pub year: Option<i32>,
}

impl FetchParams {
    pub fn dashboard(region: Region, year: Option<i32>) -> Self {
        FetchParams {
            region: Some(region),
            year,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        if self.region.is_none() && self.year.is_none() {
            return Vec::new();
        }
        vec![
            ("regiao", self.region.map(Region::query_value).unwrap_or_default()),
            ("ano", self.year.map(|y| y.to_string()).unwrap_or_default()),
        ]
    }
}

/// Decode the JSON array returned by the products endpoint.
pub fn parse_products(body: &str) -> Result<Vec<SaleRecord>> {
    serde_json::from_str(body).context("Failed to decode products response")
}

pub async fn fetch_products(
    client: &Client,
    url: &str,
    params: &FetchParams,
) -> Result<Vec<SaleRecord>> {
    let query = params.query_pairs();
    info!("Fetching products from {} with query {:?}", url, query);

    let mut request = client.get(url);
    if !query.is_empty() {
        request = request.query(&query);
    }

    let body = request
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()?
        .text()
        .await?;

    let records = parse_products(&body)?;
    info!("Fetched {} sale records", records.len());
    Ok(records)
}

/// Holds the most recently fetched dataset and the parameters it came from.
#[derive(Debug)]
pub struct DatasetCache {
    enabled: bool,
    slot: Mutex<Option<(FetchParams, Arc<Vec<SaleRecord>>)>>,
}

impl DatasetCache {
    pub fn new(enabled: bool) -> Self {
        DatasetCache {
            enabled,
            slot: Mutex::new(None),
        }
    }

    /// Returns the held dataset when `params` match, otherwise runs `fetch`
    /// and replaces the held dataset with its result. A failed fetch leaves
    /// the previous dataset in place.
    ///
    /// The lock is held across `fetch`, so concurrent callers wait for one
    /// upstream request at a time. That matches the single-user dashboard.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        params: &FetchParams,
        fetch: F,
    ) -> Result<Arc<Vec<SaleRecord>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SaleRecord>>>,
    {
        if !self.enabled {
            return Ok(Arc::new(fetch().await?));
        }

        let mut slot = self.slot.lock().await;
        if let Some((held_params, records)) = slot.as_ref() {
            if held_params == params {
                debug!("Dataset cache hit for {:?}", params);
                return Ok(Arc::clone(records));
            }
            debug!("Fetch parameters changed from {:?} to {:?}", held_params, params);
        }

        let records = Arc::new(fetch().await?);
        *slot = Some((params.clone(), Arc::clone(&records)));
        Ok(records)
    }
}

/// Shared handle used by the handlers: HTTP client, endpoint and cache.
#[derive(Debug)]
pub struct ProductsService {
    client: Client,
    url: String,
    cache: DatasetCache,
}

impl ProductsService {
    pub fn new(client: Client, url: impl Into<String>, cache_enabled: bool) -> Self {
        ProductsService {
            client,
            url: url.into(),
            cache: DatasetCache::new(cache_enabled),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Client::new(), config.products_url.clone(), config.dataset_cache)
    }

    pub async fn load(&self, params: &FetchParams) -> Result<Arc<Vec<SaleRecord>>> {
        self.cache
            .get_or_fetch(params, || fetch_products(&self.client, &self.url, params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::record;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn raw_page_params_send_no_query() {
        assert!(FetchParams::default().query_pairs().is_empty());
    }

    #[test]
    fn dashboard_params_always_send_both_keys() {
        let all = FetchParams::dashboard(Region::Brasil, None);
        assert_eq!(
            all.query_pairs(),
            vec![("regiao", String::new()), ("ano", String::new())]
        );

        let scoped = FetchParams::dashboard(Region::Nordeste, Some(2022));
        assert_eq!(
            scoped.query_pairs(),
            vec![("regiao", "nordeste".to_string()), ("ano", "2022".to_string())]
        );
    }

    #[test]
    fn parse_products_keeps_response_order() {
        let body = r#"[
            {"Produto": "Cadeira", "Categoria do Produto": "moveis", "Preço": 200.0, "Frete": 10.0,
             "Data da Compra": "15/03/2021", "Vendedor": "Ana", "Local da compra": "SP",
             "Avaliação da compra": 5, "Tipo de pagamento": "boleto", "Quantidade de parcelas": 1,
             "lat": -22.19, "lon": -48.79},
            {"Produto": "Mesa", "Categoria do Produto": "moveis", "Preço": 300.0, "Frete": 15.0,
             "Data da Compra": "02/04/2021", "Vendedor": "Bia", "Local da compra": "RJ",
             "Avaliação da compra": 4, "Tipo de pagamento": "pix", "Quantidade de parcelas": 2,
             "lat": -22.25, "lon": -42.66}
        ]"#;
        let records = parse_products(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product, "Cadeira");
        assert_eq!(records[1].product, "Mesa");
    }

    #[test]
    fn parse_products_propagates_bad_dates() {
        let body = r#"[{"Produto": "Cadeira", "Categoria do Produto": "moveis", "Preço": 200.0,
            "Frete": 10.0, "Data da Compra": "2021-03-15", "Vendedor": "Ana",
            "Local da compra": "SP", "Avaliação da compra": 5, "Tipo de pagamento": "boleto",
            "Quantidade de parcelas": 1, "lat": -22.19, "lon": -48.79}]"#;
        assert!(parse_products(body).is_err());
    }

    #[tokio::test]
    async fn cache_reuses_dataset_until_params_change() {
        let cache = DatasetCache::new(true);
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(vec![record("SP", "Ana", "moveis", 100.0, (2021, 1, 1))])
        };

        let params = FetchParams::dashboard(Region::Sul, None);
        let first = cache.get_or_fetch(&params, fetch).await.unwrap();
        let second = cache.get_or_fetch(&params, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));

        let other = FetchParams::dashboard(Region::Sul, Some(2021));
        cache.get_or_fetch(&other, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.get_or_fetch(&params, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn disabled_cache_fetches_every_time() {
        let cache = DatasetCache::new(false);
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let params = FetchParams::default();
        for _ in 0..3 {
            cache
                .get_or_fetch(&params, move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>(Vec::new())
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_dataset() {
        let cache = DatasetCache::new(true);
        let params = FetchParams::default();
        cache
            .get_or_fetch(&params, || async {
                Ok::<_, anyhow::Error>(vec![record("SP", "Ana", "moveis", 100.0, (2021, 1, 1))])
            })
            .await
            .unwrap();

        let changed = FetchParams::dashboard(Region::Norte, None);
        let failed = cache
            .get_or_fetch(&changed, || async { Err::<Vec<SaleRecord>, _>(anyhow::anyhow!("upstream down")) })
            .await;
        assert!(failed.is_err());

        let held = cache
            .get_or_fetch(&params, || async { Ok::<_, anyhow::Error>(Vec::new()) })
            .await
            .unwrap();
        assert_eq!(held.len(), 1);
    }
}
