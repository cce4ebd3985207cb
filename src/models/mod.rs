mod price_observation;
mod trade_point;

pub use price_observation::PriceObservation;
pub use trade_point::{CreateTradePoint, TradePoint};
