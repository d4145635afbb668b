pub mod alert_service;
pub mod confidence_band;
pub mod portfolio_service;
pub mod price_service;
