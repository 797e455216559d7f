// src/services/charts.rs
//
// Chart descriptions handed to the front-end plotting library. Nothing is
// rendered here; each spec names the fields to plot and carries its rows.
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::services::aggregations::{
    GroupAggregate, LocationAggregate, MonthlyAggregate, PriceStats, SellerRankings,
};

const MAP_SCOPE: &str = "south america";
const MAP_TEMPLATE: &str = "seaborn";
pub const TOP_LOCATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    ScatterGeo,
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: &'static str,
    pub y: &'static str,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_y: Option<(f64, f64)>,
    pub markers: bool,
    pub text_auto: bool,
    pub show_legend: bool,
    pub data: Value,
}

impl ChartSpec {
    fn new<T: Serialize + ?Sized>(
        kind: ChartKind,
        title: impl Into<String>,
        x: &'static str,
        y: &'static str,
        rows: &T,
    ) -> Result<Self> {
        Ok(ChartSpec {
            kind,
            title: title.into(),
            x,
            y,
            orientation: Orientation::Vertical,
            color: None,
            line_dash: None,
            size: None,
            hover_name: None,
            scope: None,
            template: None,
            y_axis_title: None,
            range_y: None,
            markers: false,
            text_auto: kind == ChartKind::Bar,
            show_legend: true,
            data: serde_json::to_value(rows)?,
        })
    }

    fn y_axis_title(mut self, title: &'static str) -> Self {
        self.y_axis_title = Some(title);
        self
    }

    fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    fn hide_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }
}

/// The price aggregate a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Revenue,
    Sales,
}

impl Measure {
    /// Field name of the measure in the serialized aggregate rows.
    pub fn field(self) -> &'static str {
        match self {
            Measure::Revenue => "revenue",
            Measure::Sales => "sales",
        }
    }

    pub fn axis_title(self) -> &'static str {
        match self {
            Measure::Revenue => "Receita",
            Measure::Sales => "Quantidade de vendas",
        }
    }

    pub fn value(self, stats: &PriceStats) -> f64 {
        match self {
            Measure::Revenue => stats.revenue,
            Measure::Sales => stats.sales as f64,
        }
    }
}

/// Bubble map over the location aggregates, bubble size from `measure`.
pub fn location_map(
    title: &str,
    locations: &[LocationAggregate],
    measure: Measure,
) -> Result<ChartSpec> {
    let mut spec = ChartSpec::new(ChartKind::ScatterGeo, title, "lon", "lat", locations)?;
    spec.size = Some(measure.field());
    spec.hover_name = Some("location");
    spec.scope = Some(MAP_SCOPE);
    spec.template = Some(MAP_TEMPLATE);
    Ok(spec)
}

/// One line per year across month names, y axis anchored at zero.
pub fn monthly_line(title: &str, months: &[MonthlyAggregate], measure: Measure) -> Result<ChartSpec> {
    let max = months
        .iter()
        .map(|m| measure.value(&m.stats))
        .fold(0.0_f64, f64::max);

    let mut spec = ChartSpec::new(ChartKind::Line, title, "month", measure.field(), months)?
        .y_axis_title(measure.axis_title());
    spec.color = Some("year");
    spec.line_dash = Some("year");
    spec.markers = true;
    spec.range_y = Some((0.0, max));
    Ok(spec)
}

pub fn top_locations_bar(
    title: &str,
    locations: &[LocationAggregate],
    measure: Measure,
) -> Result<ChartSpec> {
    let head = &locations[..locations.len().min(TOP_LOCATIONS)];
    Ok(ChartSpec::new(ChartKind::Bar, title, "location", measure.field(), head)?
        .y_axis_title(measure.axis_title()))
}

pub fn category_bar(title: &str, categories: &[GroupAggregate], measure: Measure) -> Result<ChartSpec> {
    Ok(ChartSpec::new(ChartKind::Bar, title, "key", measure.field(), categories)?
        .y_axis_title(measure.axis_title()))
}

pub fn seller_bar(title: &str, sellers: &[GroupAggregate], measure: Measure) -> Result<ChartSpec> {
    Ok(ChartSpec::new(ChartKind::Bar, title, measure.field(), "key", sellers)?.horizontal())
}

/// Inputs for the three dashboard tabs, already filtered and aggregated.
#[derive(Debug, Clone, Copy)]
pub struct ChartInputs<'a> {
    pub revenue_by_location: &'a [LocationAggregate],
    pub sales_by_location: &'a [LocationAggregate],
    pub monthly: &'a [MonthlyAggregate],
    pub revenue_by_category: &'a [GroupAggregate],
    pub sales_by_category: &'a [GroupAggregate],
    pub sellers: &'a SellerRankings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub revenue: Vec<ChartSpec>,
    pub sales: Vec<ChartSpec>,
    pub sellers: Vec<ChartSpec>,
}

pub fn dashboard_charts(inputs: ChartInputs<'_>) -> Result<DashboardCharts> {
    let revenue = vec![
        location_map("Receita por estado", inputs.revenue_by_location, Measure::Revenue)?,
        monthly_line("Receita mensal", inputs.monthly, Measure::Revenue)?,
        top_locations_bar("Top estados (receita)", inputs.revenue_by_location, Measure::Revenue)?,
        category_bar("Receita por categoria", inputs.revenue_by_category, Measure::Revenue)?,
    ];

    let sales = vec![
        location_map("Vendas por estado", inputs.sales_by_location, Measure::Sales)?,
        monthly_line("Quantidade de vendas mensal", inputs.monthly, Measure::Sales)?,
        top_locations_bar("Top 5 estados", inputs.sales_by_location, Measure::Sales)?,
        category_bar("Vendas por categoria", inputs.sales_by_category, Measure::Sales)?.hide_legend(),
    ];

    let k = inputs.sellers.k;
    let sellers = vec![
        seller_bar(
            &format!("Top {} vendedores (receita)", k),
            &inputs.sellers.by_revenue,
            Measure::Revenue,
        )?,
        seller_bar(
            &format!("Top {} vendedores (quantidade de vendas)", k),
            &inputs.sellers.by_sales,
            Measure::Sales,
        )?,
    ];

    Ok(DashboardCharts {
        revenue,
        sales,
        sellers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aggregations as agg;
    use crate::services::test_support::{located, record};

    fn charts_for(records: &[crate::models::SaleRecord]) -> DashboardCharts {
        let revenue_by_location = agg::revenue_by_location(records);
        let sales_by_location = agg::sales_by_location(records);
        let monthly = agg::monthly(records);
        let revenue_by_category = agg::revenue_by_category(records);
        let sales_by_category = agg::sales_by_category(records);
        let sellers = agg::top_sellers(records, 3);
        dashboard_charts(ChartInputs {
            revenue_by_location: &revenue_by_location,
            sales_by_location: &sales_by_location,
            monthly: &monthly,
            revenue_by_category: &revenue_by_category,
            sales_by_category: &sales_by_category,
            sellers: &sellers,
        })
        .unwrap()
    }

    #[test]
    fn tabs_hold_the_expected_charts() {
        let records = vec![
            record("SP", "Ana", "moveis", 100.0, (2021, 1, 1)),
            record("RJ", "Bia", "livros", 50.0, (2021, 2, 1)),
        ];
        let charts = charts_for(&records);

        let kinds: Vec<_> = charts.revenue.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChartKind::ScatterGeo, ChartKind::Line, ChartKind::Bar, ChartKind::Bar]
        );
        assert_eq!(charts.sales.len(), 4);
        assert_eq!(charts.sellers[0].title, "Top 3 vendedores (receita)");
        assert_eq!(charts.sellers[1].orientation, Orientation::Horizontal);
        assert!(!charts.sales[3].show_legend);
    }

    #[test]
    fn top_location_bars_keep_five_entries() {
        let records: Vec<_> = ["SP", "RJ", "MG", "BA", "PR", "RS", "SC"]
            .iter()
            .enumerate()
            .map(|(i, loc)| located(loc, -20.0, -45.0, 100.0 * (i + 1) as f64))
            .collect();
        let charts = charts_for(&records);
        let bar = &charts.revenue[2];
        let rows = bar.data.as_array().unwrap();
        assert_eq!(rows.len(), TOP_LOCATIONS);
        assert_eq!(rows[0]["location"], "SC");
        assert_eq!(rows[0]["revenue"], 700.0);
    }

    #[test]
    fn monthly_line_range_starts_at_zero() {
        let records = vec![
            record("SP", "Ana", "moveis", 100.0, (2021, 1, 1)),
            record("SP", "Ana", "moveis", 300.0, (2021, 2, 1)),
            record("SP", "Ana", "moveis", 30.0, (2021, 2, 9)),
        ];
        let charts = charts_for(&records);
        assert_eq!(charts.revenue[1].range_y, Some((0.0, 330.0)));
        assert_eq!(charts.sales[1].range_y, Some((0.0, 2.0)));
        assert_eq!(charts.revenue[1].color, Some("year"));
    }

    #[test]
    fn monthly_line_plots_the_requested_measure() {
        let months = agg::monthly(&[
            record("SP", "Ana", "moveis", 10.0, (2021, 1, 1)),
            record("SP", "Ana", "moveis", 10.0, (2021, 1, 2)),
            record("SP", "Ana", "moveis", 10.0, (2021, 1, 3)),
        ]);

        let sales = monthly_line("Vendas", &months, Measure::Sales).unwrap();
        assert_eq!(sales.y, "sales");
        assert_eq!(sales.y_axis_title, Some("Quantidade de vendas"));
        assert_eq!(sales.range_y, Some((0.0, 3.0)));

        let revenue = monthly_line("Receita", &months, Measure::Revenue).unwrap();
        assert_eq!(revenue.y, "revenue");
        assert_eq!(revenue.range_y, Some((0.0, 30.0)));
    }
}
