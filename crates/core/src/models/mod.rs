pub mod alert;
pub mod asset;
pub mod band;
pub mod forecast;
pub mod holding;
pub mod price;
pub mod settings;
pub mod transaction;
pub mod valuation;
