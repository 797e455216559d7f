// src/services/test_support.rs
use chrono::NaiveDate;

use crate::models::SaleRecord;

pub fn record(
    location: &str,
    seller: &str,
    category: &str,
    price: f64,
    (year, month, day): (i32, u32, u32),
) -> SaleRecord {
    SaleRecord {
        product: format!("{} item", category),
        category: category.to_string(),
        price,
        shipping: price / 20.0,
        purchase_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        seller: seller.to_string(),
        location: location.to_string(),
        rating: 5,
        payment_type: "cartao_credito".to_string(),
        installments: 1,
        lat: -10.0,
        lon: -50.0,
    }
}

pub fn located(location: &str, lat: f64, lon: f64, price: f64) -> SaleRecord {
    SaleRecord {
        lat,
        lon,
        ..record(location, "Ana", "moveis", price, (2021, 1, 1))
    }
}
