//! 입찰 관련 커맨드 처리
//! 입찰은 기록만 남는다 (수정, 철회, 낙찰 없음)
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::MarketError;
use crate::query::queries;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령. 입찰자 식별자는 호출자가 명시적으로 넘긴다.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub bidder: String,
    pub lot_id: i64,
    pub amount: f64,
}

impl PlaceBidCommand {
    pub fn new(bidder: impl Into<String>, lot_id: i64, amount: f64) -> Self {
        Self {
            bidder: bidder.into(),
            lot_id,
            amount,
        }
    }

    /// 로트와 무관한 입력 검증. 입찰자 식별자는 그대로 저장한다.
    fn validated(self) -> Result<Self, MarketError> {
        if self.bidder.trim().is_empty() {
            return Err(MarketError::validation("bidder must not be empty"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(MarketError::validation(format!(
                "bid amount must be a positive number, got {}",
                self.amount
            )));
        }
        Ok(self)
    }
}

/// 입찰. 기준가 확인과 삽입을 한 트랜잭션으로 처리한다.
pub async fn place_bid(
    db_manager: &DatabaseManager,
    cmd: PlaceBidCommand,
) -> Result<i64, MarketError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let cmd = cmd.validated().map_err(|e| {
        warn!("{:<12} --> 입찰 거절: {}", "Command", e);
        e
    })?;
    let pending = &cmd;

    let result = db_manager
        .run("place_bid", move || {
            let cmd = pending.clone();
            db_manager.transaction(move |tx| {
                Box::pin(async move {
                    let base_price = sqlx::query_scalar::<_, f64>(queries::GET_LOT_BASE_PRICE)
                        .bind(cmd.lot_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| MarketError::lot_not_found(cmd.lot_id))?;

                    if cmd.amount < base_price {
                        return Err(MarketError::validation(format!(
                            "bid amount {} is below the base price {} of lot {}",
                            cmd.amount, base_price, cmd.lot_id
                        )));
                    }

                    let bid_id = sqlx::query_scalar::<_, i64>(queries::INSERT_BID)
                        .bind(cmd.bidder.as_str())
                        .bind(cmd.lot_id)
                        .bind(cmd.amount)
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<i64, MarketError>(bid_id)
                })
            })
        })
        .await;

    match &result {
        Ok(bid_id) => info!(
            "{:<12} --> 입찰 완료 id: {}, lot: {}, amount: {}",
            "Command", bid_id, cmd.lot_id, cmd.amount
        ),
        Err(e) => warn!("{:<12} --> 입찰 실패: {}", "Command", e),
    }
    result
}

// endregion: --- Commands

// endregion: --- Tests
