// region:    --- Imports
use super::queries;
use crate::bidding::model::{Bid, BidderBid};
use crate::catalog::model::Lot;
use crate::database::DatabaseManager;
use crate::error::MarketError;
use tracing::info;

// endregion: --- Imports

/// 상위 입찰 기본 개수
pub const DEFAULT_TOP_BIDS: u32 = 3;

// region:    --- Query Handlers

/// 모든 로트 조회 (최근 추가 순)
pub async fn get_all_lots(db_manager: &DatabaseManager) -> Result<Vec<Lot>, MarketError> {
    info!("{:<12} --> 모든 로트 조회", "Query");
    db_manager
        .run("get_all_lots", move || async move {
            sqlx::query_as::<_, Lot>(queries::GET_ALL_LOTS)
                .fetch_all(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await
}

/// 로트 조회
pub async fn get_lot(db_manager: &DatabaseManager, lot_id: i64) -> Result<Lot, MarketError> {
    info!("{:<12} --> 로트 조회 id: {}", "Query", lot_id);
    db_manager
        .run("get_lot", move || async move {
            sqlx::query_as::<_, Lot>(queries::GET_LOT)
                .bind(lot_id)
                .fetch_optional(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await?
        .ok_or_else(|| MarketError::lot_not_found(lot_id))
}

/// 로트 수 조회
pub async fn count_lots(db_manager: &DatabaseManager) -> Result<i64, MarketError> {
    db_manager
        .run("count_lots", move || async move {
            sqlx::query_scalar::<_, i64>(queries::COUNT_LOTS)
                .fetch_one(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await
}

/// 로트별 상위 입찰 조회 (금액 내림차순, 동액이면 먼저 들어온 입찰 우선)
/// 없는 로트는 빈 목록
pub async fn get_top_bids(
    db_manager: &DatabaseManager,
    lot_id: i64,
    limit: u32,
) -> Result<Vec<Bid>, MarketError> {
    info!(
        "{:<12} --> 상위 입찰 조회 id: {}, limit: {}",
        "Query", lot_id, limit
    );
    db_manager
        .run("get_top_bids", move || async move {
            sqlx::query_as::<_, Bid>(queries::GET_TOP_BIDS)
                .bind(lot_id)
                .bind(i64::from(limit))
                .fetch_all(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await
}

/// 입찰자별 입찰 조회 (최신 순)
pub async fn get_bids_by_bidder(
    db_manager: &DatabaseManager,
    bidder: &str,
) -> Result<Vec<Bid>, MarketError> {
    info!("{:<12} --> 입찰자별 입찰 조회: {}", "Query", bidder);
    db_manager
        .run("get_bids_by_bidder", move || async move {
            sqlx::query_as::<_, Bid>(queries::GET_BIDS_BY_BIDDER)
                .bind(bidder)
                .fetch_all(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await
}

/// 입찰자별 입찰 내역 조회 (로트 이름 포함)
pub async fn get_bidder_history(
    db_manager: &DatabaseManager,
    bidder: &str,
) -> Result<Vec<BidderBid>, MarketError> {
    info!("{:<12} --> 입찰 내역 조회: {}", "Query", bidder);
    db_manager
        .run("get_bidder_history", move || async move {
            sqlx::query_as::<_, BidderBid>(queries::GET_BIDDER_HISTORY)
                .bind(bidder)
                .fetch_all(db_manager.pool())
                .await
                .map_err(MarketError::from)
        })
        .await
}

// endregion: --- Query Handlers
