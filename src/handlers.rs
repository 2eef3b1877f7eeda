// region:    --- Imports
use crate::bidding::commands::{place_bid, PlaceBidCommand};
use crate::catalog::commands::{add_lot, seed_sample_lots, AddLotCommand};
use crate::database::DatabaseManager;
use crate::query;
use crate::query::handlers::DEFAULT_TOP_BIDS;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

type AppState = State<Arc<DatabaseManager>>;

/// 상위 입찰 조회 파라미터
#[derive(Debug, Deserialize)]
pub struct TopBidsParams {
    pub limit: Option<u32>,
}

// region:    --- Router
/// 라우터 설정
pub fn routes(db_manager: Arc<DatabaseManager>) -> Router {
    // 화면 레이어(별도 프론트)를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/lots", get(handle_get_lots).post(handle_add_lot))
        .route("/lots/:id", get(handle_get_lot))
        .route("/lots/:id/top-bids", get(handle_get_top_bids))
        .route("/bids", post(handle_place_bid))
        .route("/bidders/:bidder/bids", get(handle_get_bidder_bids))
        .route("/admin/reset", post(handle_reset))
        .layer(cors)
        .with_state(db_manager)
}

// endregion: --- Router

// region:    --- Command Handlers

/// 로트 추가 (관리자)
pub async fn handle_add_lot(
    State(db_manager): AppState,
    Json(cmd): Json<AddLotCommand>,
) -> impl IntoResponse {
    match add_lot(&db_manager, cmd).await {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(db_manager): AppState,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    match place_bid(&db_manager, cmd).await {
        Ok(id) => (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 데이터베이스 리셋 후 샘플 로트 재삽입
pub async fn handle_reset(State(db_manager): AppState) -> impl IntoResponse {
    info!("{:<12} --> 데이터베이스 리셋 요청", "Handler");
    if let Err(e) = db_manager.reset_database().await {
        return e.into_response();
    }
    match seed_sample_lots(&db_manager).await {
        Ok(seeded) => Json(serde_json::json!({ "seeded": seeded })).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 로트 조회
pub async fn handle_get_lots(State(db_manager): AppState) -> impl IntoResponse {
    info!("{:<12} --> 모든 로트 조회", "Handler");
    match query::handlers::get_all_lots(&db_manager).await {
        Ok(lots) => Json(lots).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 로트 조회
pub async fn handle_get_lot(
    State(db_manager): AppState,
    Path(lot_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 로트 조회 id: {}", "Handler", lot_id);
    match query::handlers::get_lot(&db_manager, lot_id).await {
        Ok(lot) => Json(lot).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 로트별 상위 입찰 조회
pub async fn handle_get_top_bids(
    State(db_manager): AppState,
    Path(lot_id): Path<i64>,
    Query(params): Query<TopBidsParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_BIDS);
    info!(
        "{:<12} --> 상위 입찰 조회 id: {}, limit: {}",
        "Handler", lot_id, limit
    );
    match query::handlers::get_top_bids(&db_manager, lot_id, limit).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 내 입찰 내역 조회
pub async fn handle_get_bidder_bids(
    State(db_manager): AppState,
    Path(bidder): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 내역 조회: {}", "Handler", bidder);
    match query::handlers::get_bidder_history(&db_manager, &bidder).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Query Handlers
