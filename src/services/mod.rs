// src/services/mod.rs
pub mod aggregations;
pub mod charts;
pub mod csv_export;
pub mod dashboard;
pub mod filters;
pub mod presenter;
pub mod products;

#[cfg(test)]
pub(crate) mod test_support;
