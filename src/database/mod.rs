// region:    --- Imports
use crate::bidding::model::Bid;
use crate::catalog::model::Lot;
use crate::config::Config;
use crate::error::MarketError;
use crate::query::queries;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

// endregion: --- Imports

const RECREATE_DB_SQL: &str = include_str!("../../sql/00-recreate-db.sql");
const CREATE_SCHEMA_SQL: &str = include_str!("../../sql/01-create-schema.sql");

// region:    --- Database Manager
pub struct DatabaseManager {
    pub pool: Arc<SqlitePool>,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    pub async fn new(config: &Config) -> Result<Self, MarketError> {
        let connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| MarketError::StorageUnavailable(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections.max(1));
        if config.is_in_memory() {
            // 인메모리 DB 는 마지막 커넥션이 닫히면 사라진다
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = retry_on_busy(
            config.retry_attempts,
            config.retry_delay,
            "connect",
            || {
                let pool_options = pool_options.clone();
                let connect_options = connect_options.clone();
                async move {
                    pool_options
                        .connect_with(connect_options)
                        .await
                        .map_err(MarketError::from)
                }
            },
        )
        .await?;

        info!(
            "{:<12} --> 데이터베이스 연결: {}",
            "Database", config.database_url
        );

        Ok(Self {
            pool: Arc::new(pool),
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: config.retry_delay,
        })
    }

    /// 데이터베이스 풀 가져오기
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 잠금 오류 재시도 래퍼. 남은 sqlx 에러는 StorageUnavailable 로 변환
    pub async fn run<T, F, Fut>(&self, label: &str, op: F) -> Result<T, MarketError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MarketError>>,
    {
        retry_on_busy(self.retry_attempts, self.retry_delay, label, op).await
    }

    /// 트랜잭션 실행
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Sqlite>,
        ) -> Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        let result = f(&mut tx).await;
        match result {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 데이터베이스 초기화
    /// 기존 테이블이 정규 스키마와 다르면 삭제 후 재생성한다 (데이터 유실 허용)
    pub async fn initialize_database(&self) -> Result<(), MarketError> {
        let drifted = self.run("schema-check", move || self.drifted_tables()).await?;
        if !drifted.is_empty() {
            warn!(
                "{:<12} --> 스키마 불일치 {:?}: 테이블 삭제 후 재생성 (기존 데이터 유실)",
                "Database", drifted
            );
            self.run("recreate", move || self.execute_multi_query(RECREATE_DB_SQL))
                .await?;
        }

        self.run("create-schema", move || self.execute_multi_query(CREATE_SCHEMA_SQL))
            .await?;
        info!("{:<12} --> 스키마 준비 완료", "Database");
        Ok(())
    }

    /// 모든 테이블 삭제 후 재생성
    pub async fn reset_database(&self) -> Result<(), MarketError> {
        warn!("{:<12} --> 데이터베이스 리셋", "Database");
        self.run("recreate", move || self.execute_multi_query(RECREATE_DB_SQL))
            .await?;
        self.run("create-schema", move || self.execute_multi_query(CREATE_SCHEMA_SQL))
            .await
    }

    /// 기존 행을 정규 모델로 읽을 수 없는 테이블 목록
    /// 컬럼 이름뿐 아니라 NULL, 날짜 형식 같은 값도 확인한다
    async fn drifted_tables(&self) -> Result<Vec<&'static str>, MarketError> {
        let lots = sqlx::query_as::<_, Lot>(queries::GET_ALL_LOTS)
            .fetch_all(&*self.pool)
            .await
            .map(|_| ());
        let bids = sqlx::query_as::<_, Bid>(queries::GET_ALL_BIDS)
            .fetch_all(&*self.pool)
            .await
            .map(|_| ());

        let mut drifted = Vec::new();
        for (table, checked) in [("lots", lots), ("bids", bids)] {
            match checked {
                Ok(()) => {}
                Err(sqlx::Error::Database(db)) if db.message().contains("no such table") => {}
                Err(e) => {
                    let e = MarketError::from(e);
                    if e.is_busy() {
                        return Err(e);
                    }
                    warn!("{:<12} --> {} 테이블 확인 실패: {}", "Database", table, e);
                    drifted.push(table);
                }
            }
        }
        Ok(drifted)
    }

    /// 여러 쿼리 실행
    async fn execute_multi_query(&self, sql: &str) -> Result<(), MarketError> {
        for query in sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&*self.pool).await?;
            }
        }
        Ok(())
    }
}

// endregion: --- Database Manager

// region:    --- Retry
async fn retry_on_busy<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    label: &str,
    mut op: F,
) -> Result<T, MarketError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_busy() && attempt < attempts => {
                warn!(
                    "{:<12} --> {} 잠금 감지, 재시도 ({}/{})",
                    "Database", label, attempt, attempts
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(MarketError::Database(e)) => {
                error!(
                    "{:<12} --> {} 실패 ({}회 시도): {}",
                    "Database", label, attempt, e
                );
                return Err(MarketError::StorageUnavailable(format!(
                    "{} failed after {} attempt(s): {}",
                    label, attempt, e
                )));
            }
            Err(e) => return Err(e),
        }
    }
}

// endregion: --- Retry

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retry_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), MarketError> =
            retry_on_busy(3, Duration::from_millis(1), "test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(MarketError::Database(sqlx::Error::PoolTimedOut)) }
            })
            .await;

        assert!(matches!(result, Err(MarketError::StorageUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_recovers_when_lock_clears() {
        let calls = AtomicU32::new(0);
        let result = retry_on_busy(3, Duration::from_millis(1), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(MarketError::Database(sqlx::Error::PoolTimedOut))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
    }

    #[tokio::test]
    async fn validation_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), MarketError> =
            retry_on_busy(3, Duration::from_millis(1), "test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(MarketError::validation("bad input")) }
            })
            .await;

        assert!(matches!(result, Err(MarketError::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drifted_bids_table_is_recreated() {
        let db = DatabaseManager::new(&Config::in_memory()).await.unwrap();
        sqlx::query("CREATE TABLE bids (id INTEGER PRIMARY KEY, user_phone TEXT, bid_price REAL)")
            .execute(db.pool())
            .await
            .unwrap();

        db.initialize_database().await.unwrap();

        let drifted = db.drifted_tables().await.unwrap();
        assert!(drifted.is_empty());
        sqlx::query("SELECT bidder FROM bids")
            .fetch_all(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn undecodable_legacy_lots_are_recreated() {
        let db = DatabaseManager::new(&Config::in_memory()).await.unwrap();
        // 예전 앱이 만든 형태: NULL 허용 컬럼, 날짜만 있는 date_added
        sqlx::query(
            "CREATE TABLE lots (id INTEGER PRIMARY KEY AUTOINCREMENT, item_name TEXT, \
             quantity TEXT, base_price REAL, date_added TEXT)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO lots (item_name, quantity, base_price, date_added) \
             VALUES ('Apples', '100 kg', 120.0, '2025-01-01')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert_eq!(db.drifted_tables().await.unwrap(), ["lots"]);
        db.initialize_database().await.unwrap();

        let lots = crate::query::handlers::get_all_lots(&db).await.unwrap();
        assert!(lots.is_empty());
    }

    #[tokio::test]
    async fn readable_data_survives_initialize() {
        let db = DatabaseManager::new(&Config::in_memory()).await.unwrap();
        db.initialize_database().await.unwrap();
        crate::catalog::commands::add_lot(
            &db,
            crate::catalog::commands::AddLotCommand::new("Kiwi", "5 kg", 200.0),
        )
        .await
        .unwrap();

        db.initialize_database().await.unwrap();

        let lots = crate::query::handlers::get_all_lots(&db).await.unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].name, "Kiwi");
    }
}
// endregion: --- Tests
