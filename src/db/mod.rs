pub mod price_queries;
pub mod trade_queries;
