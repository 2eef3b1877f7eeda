use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 로트 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lot {
    pub id: i64,
    pub name: String,
    /// 자유 형식 수량 (예: "100 kg")
    pub quantity: String,
    pub base_price: f64,
    pub created_at: DateTime<Utc>,
}
