pub mod price_service;
pub mod trade_service;
