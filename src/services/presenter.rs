// src/services/presenter.rs
use serde::Serialize;

use crate::models::{Page, Region, FIRST_YEAR, LAST_YEAR};
use crate::services::aggregations::PriceStats;

pub const CURRENCY_PREFIX: &str = "R$";

/// Human readable magnitude: plain below a thousand, then `mil`, then `milhões`.
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut value = value;
    let mut unit = "";
    for next_unit in ["mil", "milhões"] {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = next_unit;
    }

    let number = format!("{:.2}", value);
    [prefix, number.as_str(), unit]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The two headline numbers shown above every dashboard tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub revenue: String,
    pub sales: String,
}

impl Metrics {
    pub fn from_totals(totals: &PriceStats) -> Self {
        Metrics {
            revenue: format_number(totals.revenue, CURRENCY_PREFIX),
            sales: format_number(totals.sales as f64, ""),
        }
    }
}

/// Summary line under the raw data table.
pub fn shape_caption(rows: usize, columns: usize) -> String {
    format!("A tabela possui {} linhas e {} colunas", rows, columns)
}

#[derive(Debug, Clone, Serialize)]
pub struct Navigation {
    pub pages: Vec<Page>,
    pub regions: Vec<Region>,
    pub years: (i32, i32),
}

impl Navigation {
    pub fn new() -> Self {
        Navigation {
            pages: vec![Page::RawData, Page::Dashboard],
            regions: Region::ALL.to_vec(),
            years: (FIRST_YEAR, LAST_YEAR),
        }
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}
