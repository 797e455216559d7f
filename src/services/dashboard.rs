// src/services/dashboard.rs
use anyhow::{bail, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{Region, SaleRecord, FIRST_YEAR, LAST_YEAR};
use crate::services::aggregations::{
    self, GroupAggregate, LocationAggregate, MonthlyAggregate, SellerRankings,
    DEFAULT_TOP_SELLERS,
};
use crate::services::charts::{self, ChartInputs, DashboardCharts};
use crate::services::filters::{filter_sellers, unique};
use crate::services::presenter::Metrics;
use crate::services::products::FetchParams;

/// Controls of the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub region: Region,
    /// "Whole period" checkbox; when set the year is ignored.
    pub all_years: bool,
    pub year: Option<i32>,
    pub sellers: Vec<String>,
    pub top_sellers: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        DashboardQuery {
            region: Region::Brasil,
            all_years: true,
            year: None,
            sellers: Vec::new(),
            top_sellers: DEFAULT_TOP_SELLERS,
        }
    }
}

impl DashboardQuery {
    /// Upstream parameters for this query. An unchecked "whole period" box
    /// with no year picked starts the slider at its first year.
    pub fn fetch_params(&self) -> Result<FetchParams> {
        let year = if self.all_years {
            None
        } else {
            let year = self.year.unwrap_or(FIRST_YEAR);
            if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
                bail!("year must be between {} and {}, got {}", FIRST_YEAR, LAST_YEAR, year);
            }
            Some(year)
        };
        Ok(FetchParams::dashboard(self.region, year))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: Metrics,
    /// Sellers present in the fetched scope, offered by the seller control.
    pub seller_options: Vec<String>,
    pub revenue_by_location: Vec<LocationAggregate>,
    pub sales_by_location: Vec<LocationAggregate>,
    pub monthly: Vec<MonthlyAggregate>,
    pub revenue_by_category: Vec<GroupAggregate>,
    pub sales_by_category: Vec<GroupAggregate>,
    pub top_sellers: SellerRankings,
    pub charts: DashboardCharts,
}

pub fn build(records: &[SaleRecord], query: &DashboardQuery) -> Result<Dashboard> {
    let seller_options = unique(records.iter().map(|r| r.seller.as_str()));
    let data = filter_sellers(records, &query.sellers);
    debug!(
        "Building dashboard over {} of {} records",
        data.len(),
        records.len()
    );

    let revenue_by_location = aggregations::revenue_by_location(&data);
    let sales_by_location = aggregations::sales_by_location(&data);
    let monthly = aggregations::monthly(&data);
    let revenue_by_category = aggregations::revenue_by_category(&data);
    let sales_by_category = aggregations::sales_by_category(&data);
    let top_sellers = aggregations::top_sellers(&data, query.top_sellers);

    let charts = charts::dashboard_charts(ChartInputs {
        revenue_by_location: &revenue_by_location,
        sales_by_location: &sales_by_location,
        monthly: &monthly,
        revenue_by_category: &revenue_by_category,
        sales_by_category: &sales_by_category,
        sellers: &top_sellers,
    })?;

    Ok(Dashboard {
        metrics: Metrics::from_totals(&aggregations::totals(&data)),
        seller_options,
        revenue_by_location,
        sales_by_location,
        monthly,
        revenue_by_category,
        sales_by_category,
        top_sellers,
        charts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::record;

    fn records() -> Vec<SaleRecord> {
        vec![
            record("SP", "Ana", "moveis", 1500.0, (2021, 1, 5)),
            record("RJ", "Bia", "livros", 20.0, (2021, 1, 20)),
            record("SP", "Bia", "livros", 30.0, (2021, 3, 2)),
        ]
    }

    #[test]
    fn default_query_covers_everything() {
        let query = DashboardQuery::default();
        assert_eq!(
            query.fetch_params().unwrap(),
            FetchParams::dashboard(Region::Brasil, None)
        );

        let dashboard = build(&records(), &query).unwrap();
        assert_eq!(dashboard.metrics.revenue, "R$ 1.55 mil");
        assert_eq!(dashboard.metrics.sales, "3.00");
        assert_eq!(dashboard.seller_options, vec!["Ana", "Bia"]);
        assert_eq!(dashboard.top_sellers.k, DEFAULT_TOP_SELLERS);
        assert_eq!(dashboard.monthly.len(), 3);
    }

    #[test]
    fn year_is_used_only_when_whole_period_is_off() {
        let query = DashboardQuery {
            year: Some(2022),
            ..Default::default()
        };
        assert_eq!(query.fetch_params().unwrap().year, None);

        let query = DashboardQuery {
            all_years: false,
            year: Some(2022),
            region: Region::Sudeste,
            ..Default::default()
        };
        assert_eq!(
            query.fetch_params().unwrap(),
            FetchParams::dashboard(Region::Sudeste, Some(2022))
        );

        let unset = DashboardQuery {
            all_years: false,
            ..Default::default()
        };
        assert_eq!(unset.fetch_params().unwrap().year, Some(FIRST_YEAR));
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        let query = DashboardQuery {
            all_years: false,
            year: Some(2019),
            ..Default::default()
        };
        assert!(query.fetch_params().is_err());
    }

    #[test]
    fn seller_selection_narrows_aggregates_but_not_options() {
        let query = DashboardQuery {
            sellers: vec!["Bia".into()],
            ..Default::default()
        };
        let dashboard = build(&records(), &query).unwrap();
        assert_eq!(dashboard.seller_options, vec!["Ana", "Bia"]);
        assert_eq!(dashboard.metrics.revenue, "R$ 50.00");
        assert_eq!(dashboard.top_sellers.by_revenue.len(), 1);
        assert_eq!(dashboard.revenue_by_category[0].key, "livros");
    }
}
