//! 로트 관련 커맨드 처리
//! 1. 로트 추가
//! 2. 샘플 로트 시드
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::MarketError;
use crate::query::{handlers, queries};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

/// 카탈로그가 비어 있을 때 넣는 샘플 로트 (이름, 수량, 기준가)
const SAMPLE_LOTS: [(&str, &str, f64); 4] = [
    ("Apples", "100 kg", 120.0),
    ("Bananas", "200 kg", 60.0),
    ("Mangoes", "150 kg", 180.0),
    ("Oranges", "180 kg", 90.0),
];

// region:    --- Commands
/// 로트 추가 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddLotCommand {
    pub name: String,
    pub quantity: String,
    pub base_price: f64,
}

impl AddLotCommand {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, base_price: f64) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            base_price,
        }
    }

    /// 입력 검증. 이름과 수량은 앞뒤 공백을 제거한다.
    pub fn validated(self) -> Result<Self, MarketError> {
        let name = self.name.trim();
        let quantity = self.quantity.trim();
        if name.is_empty() {
            return Err(MarketError::validation("lot name must not be empty"));
        }
        if quantity.is_empty() {
            return Err(MarketError::validation("lot quantity must not be empty"));
        }
        // 입찰 금액은 양수여야 하므로 기준가도 양수
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(MarketError::validation(format!(
                "base price must be a positive number, got {}",
                self.base_price
            )));
        }
        Ok(Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            base_price: self.base_price,
        })
    }
}

/// 1. 로트 추가
pub async fn add_lot(db_manager: &DatabaseManager, cmd: AddLotCommand) -> Result<i64, MarketError> {
    info!("{:<12} --> 로트 추가 요청: {:?}", "Command", cmd);
    let cmd = cmd.validated().map_err(|e| {
        warn!("{:<12} --> 로트 추가 거절: {}", "Command", e);
        e
    })?;
    let cmd = &cmd;

    let lot_id = db_manager
        .run("add_lot", move || async move {
            sqlx::query_scalar::<_, i64>(queries::INSERT_LOT)
                .bind(cmd.name.as_str())
                .bind(cmd.quantity.as_str())
                .bind(cmd.base_price)
                .bind(Utc::now())
                .fetch_one(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await?;

    info!("{:<12} --> 로트 추가 완료 id: {}", "Command", lot_id);
    Ok(lot_id)
}

/// 2. 카탈로그가 비어 있으면 샘플 로트 추가. 추가한 개수 반환
pub async fn seed_sample_lots(db_manager: &DatabaseManager) -> Result<usize, MarketError> {
    if handlers::count_lots(db_manager).await? > 0 {
        return Ok(0);
    }

    for (name, quantity, base_price) in SAMPLE_LOTS {
        add_lot(db_manager, AddLotCommand::new(name, quantity, base_price)).await?;
    }
    info!(
        "{:<12} --> 샘플 로트 {}개 추가",
        "Command",
        SAMPLE_LOTS.len()
    );
    Ok(SAMPLE_LOTS.len())
}

// endregion: --- Commands

// endregion: --- Tests
