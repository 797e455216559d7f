// src/services/filters.rs
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::models::{Column, SaleRecord, Table};

/// Inclusive range used by the slider and date controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(min: T, max: T) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Smallest range covering every value, `None` for an empty input.
    pub fn observed<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().fold(None, |acc: Option<Range<T>>, v| match acc {
            None => Some(Range::new(v, v)),
            Some(r) => Some(Range::new(
                if v < r.min { v } else { r.min },
                if v > r.max { v } else { r.max },
            )),
        })
    }
}

/// Selections made on the raw data page.
///
/// A `None` field keeps its default: every observed value, the full observed
/// range, or every column. `Some(vec![])` on a categorical field matches
/// nothing, so the whole result is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDataFilter {
    pub columns: Option<Vec<Column>>,
    pub products: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub price: Option<Range<f64>>,
    pub shipping: Option<Range<f64>>,
    pub purchase_date: Option<Range<NaiveDate>>,
    pub sellers: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub rating: Option<Range<u8>>,
    pub payment_types: Option<Vec<String>>,
    pub installments: Option<Range<u32>>,
}

fn is_chosen(chosen: &Option<Vec<String>>, value: &str) -> bool {
    match chosen {
        None => true,
        Some(values) => values.iter().any(|v| v == value),
    }
}

fn in_range<T: PartialOrd + Copy>(range: Option<Range<T>>, value: T) -> bool {
    range.map_or(true, |r| r.contains(value))
}

impl RawDataFilter {
    pub fn matches(&self, record: &SaleRecord) -> bool {
        is_chosen(&self.products, &record.product)
            && is_chosen(&self.categories, &record.category)
            && in_range(self.price, record.price)
            && in_range(self.shipping, record.shipping)
            && in_range(self.purchase_date, record.purchase_date)
            && is_chosen(&self.sellers, &record.seller)
            && is_chosen(&self.locations, &record.location)
            && in_range(self.rating, record.rating)
            && is_chosen(&self.payment_types, &record.payment_type)
            && in_range(self.installments, record.installments)
    }

    pub fn projection(&self) -> Vec<Column> {
        self.columns
            .clone()
            .unwrap_or_else(|| Column::ALL.to_vec())
    }
}

/// Keep the records accepted by every dimension of `filter`, in their
/// original order, and project them onto the chosen columns.
pub fn apply(records: &[SaleRecord], filter: &RawDataFilter) -> Table {
    let columns = filter.projection();
    let rows: Vec<_> = records
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| columns.iter().map(|c| c.cell(r)).collect())
        .collect();
    debug!(
        "Filter kept {} of {} records across {} columns",
        rows.len(),
        records.len(),
        columns.len()
    );
    Table { columns, rows }
}

/// Seller selection on the dashboard page. Unlike the raw data page an empty
/// selection leaves the data untouched.
pub fn filter_sellers<'a>(records: &'a [SaleRecord], sellers: &[String]) -> Cow<'a, [SaleRecord]> {
    if sellers.is_empty() {
        return Cow::Borrowed(records);
    }
    Cow::Owned(
        records
            .iter()
            .filter(|r| sellers.iter().any(|s| *s == r.seller))
            .cloned()
            .collect(),
    )
}

/// Values offered by the raw data controls before the user narrows anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub columns: Vec<Column>,
    pub products: Vec<String>,
    pub categories: Vec<String>,
    pub price: Option<Range<f64>>,
    pub shipping: Option<Range<f64>>,
    pub purchase_date: Option<Range<NaiveDate>>,
    pub sellers: Vec<String>,
    pub locations: Vec<String>,
    pub rating: Option<Range<u8>>,
    pub payment_types: Vec<String>,
    pub installments: Option<Range<u32>>,
}

/// Distinct values in first-seen order.
pub fn unique<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = Vec::<String>::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

impl FilterOptions {
    pub fn observe(records: &[SaleRecord]) -> Self {
        FilterOptions {
            columns: Column::ALL.to_vec(),
            products: unique(records.iter().map(|r| r.product.as_str())),
            categories: unique(records.iter().map(|r| r.category.as_str())),
            price: Range::observed(records.iter().map(|r| r.price)),
            shipping: Range::observed(records.iter().map(|r| r.shipping)),
            purchase_date: Range::observed(records.iter().map(|r| r.purchase_date)),
            sellers: unique(records.iter().map(|r| r.seller.as_str())),
            locations: unique(records.iter().map(|r| r.location.as_str())),
            rating: Range::observed(records.iter().map(|r| r.rating)),
            payment_types: unique(records.iter().map(|r| r.payment_type.as_str())),
            installments: Range::observed(records.iter().map(|r| r.installments)),
        }
    }
}
