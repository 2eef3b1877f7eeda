// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Market Error
/// 마켓 공통 에러
#[derive(Debug, Error)]
pub enum MarketError {
    /// 잘못된 입력 (빈 필드, 음수 가격, 기준가 미만 입찰 등)
    #[error("{0}")]
    Validation(String),

    /// 참조한 로트가 없음
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// 재시도 한도를 넘긴 잠금, 또는 손상된 저장소
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// 연산 내부 전파용. 재시도 래퍼를 빠져나가면 StorageUnavailable 로 바뀐다.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn lot_not_found(id: i64) -> Self {
        Self::NotFound { entity: "lot", id }
    }

    /// 응답에 담기는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::StorageUnavailable(_) | Self::Database(_) => "STORAGE_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::StorageUnavailable(_) | Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// SQLite 가 파일 잠금(BUSY/LOCKED)을 보고했거나 풀 대기 시간이 초과된 경우
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::PoolTimedOut) => true,
            Self::Database(sqlx::Error::Database(db)) => {
                // 확장 코드의 하위 8비트가 기본 코드 (SQLITE_BUSY = 5, SQLITE_LOCKED = 6)
                let primary = db
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);
                matches!(primary, Some(5) | Some(6)) || db.message().contains("database is locked")
            }
            _ => false,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

// endregion: --- Market Error
