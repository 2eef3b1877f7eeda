use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub bidder: String,
    pub lot_id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

// 내 입찰 내역 (로트 이름 포함)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidderBid {
    pub id: i64,
    pub bidder: String,
    pub lot_id: i64,
    pub item_name: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}
