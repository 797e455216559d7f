// src/services/aggregations.rs
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::SaleRecord;

pub const DEFAULT_TOP_SELLERS: usize = 5;
pub const MIN_TOP_SELLERS: usize = 2;
pub const MAX_TOP_SELLERS: usize = 10;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Sum (`revenue`) and count (`sales`) of price over one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceStats {
    pub revenue: f64,
    pub sales: usize,
}

impl PriceStats {
    fn add(&mut self, price: f64) {
        self.revenue += price;
        self.sales += 1;
    }
}

pub fn totals(records: &[SaleRecord]) -> PriceStats {
    records.iter().fold(PriceStats::default(), |mut acc, r| {
        acc.add(r.price);
        acc
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationAggregate {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(flatten)]
    pub stats: PriceStats,
}

/// Per-location stats in first-seen order, carrying the coordinates of the
/// first record seen for each location.
pub fn by_location(records: &[SaleRecord]) -> Vec<LocationAggregate> {
    let mut groups: Vec<LocationAggregate> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.location == record.location) {
            Some(group) => group.stats.add(record.price),
            None => {
                let mut stats = PriceStats::default();
                stats.add(record.price);
                groups.push(LocationAggregate {
                    location: record.location.clone(),
                    lat: record.lat,
                    lon: record.lon,
                    stats,
                });
            }
        }
    }
    groups
}

pub fn revenue_by_location(records: &[SaleRecord]) -> Vec<LocationAggregate> {
    let mut groups = by_location(records);
    groups.sort_by(|a, b| b.stats.revenue.total_cmp(&a.stats.revenue));
    groups
}

pub fn sales_by_location(records: &[SaleRecord]) -> Vec<LocationAggregate> {
    let mut groups = by_location(records);
    groups.sort_by(|a, b| b.stats.sales.cmp(&a.stats.sales));
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    /// Last day of the calendar month, the bucket label.
    pub month_end: NaiveDate,
    pub year: i32,
    pub month: &'static str,
    #[serde(flatten)]
    pub stats: PriceStats,
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Calendar-month buckets from the first to the last purchase month.
/// Months without sales are present with zero revenue and zero sales.
pub fn monthly(records: &[SaleRecord]) -> Vec<MonthlyAggregate> {
    let mut buckets: BTreeMap<(i32, u32), PriceStats> = BTreeMap::new();
    for record in records {
        let key = (record.purchase_date.year(), record.purchase_date.month());
        buckets.entry(key).or_default().add(record.price);
    }

    let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut out = Vec::new();
    let mut key = first;
    while key <= last {
        let (year, month) = key;
        if let Some(end) = month_end(year, month) {
            out.push(MonthlyAggregate {
                month_end: end,
                year,
                month: MONTH_NAMES[(month - 1) as usize],
                stats: buckets.get(&key).copied().unwrap_or_default(),
            });
        }
        key = next_month(key);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate {
    pub key: String,
    #[serde(flatten)]
    pub stats: PriceStats,
}

/// Stats grouped by an arbitrary string key, ordered by key.
pub fn group_by<F>(records: &[SaleRecord], key: F) -> Vec<GroupAggregate>
where
    F: Fn(&SaleRecord) -> &str,
{
    let mut groups: BTreeMap<&str, PriceStats> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record.price);
    }
    groups
        .into_iter()
        .map(|(key, stats)| GroupAggregate {
            key: key.to_string(),
            stats,
        })
        .collect()
}

pub fn sort_by_revenue(mut groups: Vec<GroupAggregate>) -> Vec<GroupAggregate> {
    groups.sort_by(|a, b| b.stats.revenue.total_cmp(&a.stats.revenue));
    groups
}

pub fn sort_by_sales(mut groups: Vec<GroupAggregate>) -> Vec<GroupAggregate> {
    groups.sort_by(|a, b| b.stats.sales.cmp(&a.stats.sales));
    groups
}

pub fn revenue_by_category(records: &[SaleRecord]) -> Vec<GroupAggregate> {
    sort_by_revenue(group_by(records, |r| r.category.as_str()))
}

pub fn sales_by_category(records: &[SaleRecord]) -> Vec<GroupAggregate> {
    sort_by_sales(group_by(records, |r| r.category.as_str()))
}

pub fn by_seller(records: &[SaleRecord]) -> Vec<GroupAggregate> {
    group_by(records, |r| r.seller.as_str())
}

pub fn clamp_top_k(k: usize) -> usize {
    k.clamp(MIN_TOP_SELLERS, MAX_TOP_SELLERS)
}

/// Seller rankings by revenue and by sales, each cut to its own top K.
/// The two lists may name different sellers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerRankings {
    pub k: usize,
    pub by_revenue: Vec<GroupAggregate>,
    pub by_sales: Vec<GroupAggregate>,
}

pub fn top_sellers(records: &[SaleRecord], k: usize) -> SellerRankings {
    let k = clamp_top_k(k);
    let sellers = by_seller(records);

    let mut by_revenue = sort_by_revenue(sellers.clone());
    by_revenue.truncate(k);
    let mut by_sales = sort_by_sales(sellers);
    by_sales.truncate(k);

    SellerRankings {
        k,
        by_revenue,
        by_sales,
    }
}
