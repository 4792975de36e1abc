use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::timestamp::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TradeSide {
    Buy,
    Sell,
}

string_enum!(TradeSide {
    Buy => "buy",
    Sell => "sell",
});

/// One executed market trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entity: EntityId,
    pub resource: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub unit_price: f64,
    /// Realized profit against base price. Positive is a good deal.
    pub profit: f64,
    pub at: Timestamp,
}
