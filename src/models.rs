// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One sale as returned by the products API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Frete")]
    pub shipping: f64,
    #[serde(rename = "Data da Compra", with = "dmy_date")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub location: String,
    #[serde(rename = "Avaliação da compra")]
    pub rating: u8,
    #[serde(rename = "Tipo de pagamento")]
    pub payment_type: String,
    #[serde(rename = "Quantidade de parcelas")]
    pub installments: u32,
    pub lat: f64,
    pub lon: f64,
}

/// The API sends purchase dates as `dd/mm/yyyy`.
pub mod dmy_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Columns of the raw data table, in the order the API returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "Produto")]
    Product,
    #[serde(rename = "Categoria do Produto")]
    Category,
    #[serde(rename = "Preço")]
    Price,
    #[serde(rename = "Frete")]
    Shipping,
    #[serde(rename = "Data da Compra")]
    PurchaseDate,
    #[serde(rename = "Vendedor")]
    Seller,
    #[serde(rename = "Local da compra")]
    Location,
    #[serde(rename = "Avaliação da compra")]
    Rating,
    #[serde(rename = "Tipo de pagamento")]
    PaymentType,
    #[serde(rename = "Quantidade de parcelas")]
    Installments,
    #[serde(rename = "lat")]
    Lat,
    #[serde(rename = "lon")]
    Lon,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Product,
        Column::Category,
        Column::Price,
        Column::Shipping,
        Column::PurchaseDate,
        Column::Seller,
        Column::Location,
        Column::Rating,
        Column::PaymentType,
        Column::Installments,
        Column::Lat,
        Column::Lon,
    ];

    /// Header text, identical to the upstream JSON key.
    pub fn name(self) -> &'static str {
        match self {
            Column::Product => "Produto",
            Column::Category => "Categoria do Produto",
            Column::Price => "Preço",
            Column::Shipping => "Frete",
            Column::PurchaseDate => "Data da Compra",
            Column::Seller => "Vendedor",
            Column::Location => "Local da compra",
            Column::Rating => "Avaliação da compra",
            Column::PaymentType => "Tipo de pagamento",
            Column::Installments => "Quantidade de parcelas",
            Column::Lat => "lat",
            Column::Lon => "lon",
        }
    }

    pub fn cell(self, record: &SaleRecord) -> Cell {
        match self {
            Column::Product => Cell::Text(record.product.clone()),
            Column::Category => Cell::Text(record.category.clone()),
            Column::Price => Cell::Number(record.price),
            Column::Shipping => Cell::Number(record.shipping),
            Column::PurchaseDate => Cell::Date(record.purchase_date),
            Column::Seller => Cell::Text(record.seller.clone()),
            Column::Location => Cell::Text(record.location.clone()),
            Column::Rating => Cell::Integer(i64::from(record.rating)),
            Column::PaymentType => Cell::Text(record.payment_type.clone()),
            Column::Installments => Cell::Integer(i64::from(record.installments)),
            Column::Lat => Cell::Number(record.lat),
            Column::Lon => Cell::Number(record.lon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    /// Serialized as `YYYY-MM-DD`.
    Date(NaiveDate),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// A filtered, projected view of the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }
}

/// Years offered by the dashboard year slider.
pub const FIRST_YEAR: i32 = 2020;
pub const LAST_YEAR: i32 = 2023;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Brasil")]
    Brasil,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    #[serde(rename = "Nordeste")]
    Nordeste,
    #[serde(rename = "Norte")]
    Norte,
    #[serde(rename = "Sudeste")]
    Sudeste,
    #[serde(rename = "Sul")]
    Sul,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Brasil,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Value for the `regiao` query parameter. `Brasil` means every region.
    pub fn query_value(self) -> String {
        match self {
            Region::Brasil => String::new(),
            other => other.name().to_lowercase(),
        }
    }
}

/// Navigation targets of the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Page {
    #[serde(rename = "Dados Brutos")]
    RawData,
    #[serde(rename = "Dashboard")]
    Dashboard,
}
