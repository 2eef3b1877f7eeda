//! 환경 변수 기반 설정
// region:    --- Imports
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

// endregion: --- Imports

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 접속 URL (예: sqlite://fruitbid.db, sqlite::memory:)
    pub database_url: String,
    pub listen_addr: String,
    pub max_connections: u32,
    /// 잠금 오류 시 총 시도 횟수
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub busy_timeout: Duration,
    /// 로트가 하나도 없을 때 샘플 로트 삽입 여부
    pub seed_sample_lots: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://fruitbid.db".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            max_connections: 5,
            retry_attempts: 3,
            retry_delay: Duration::from_millis(200),
            busy_timeout: Duration::from_secs(5),
            seed_sample_lots: true,
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 읽기. 없거나 잘못된 값은 기본값 사용
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            retry_attempts: env_or("DB_RETRY_ATTEMPTS", defaults.retry_attempts).max(1),
            retry_delay: Duration::from_millis(env_or(
                "DB_RETRY_DELAY_MS",
                defaults.retry_delay.as_millis() as u64,
            )),
            busy_timeout: Duration::from_secs(env_or(
                "DB_BUSY_TIMEOUT_SECS",
                defaults.busy_timeout.as_secs(),
            )),
            seed_sample_lots: env_or("SEED_SAMPLE_LOTS", defaults.seed_sample_lots),
        }
    }

    /// 테스트용 인메모리 설정. 커넥션이 하나뿐이어야 같은 DB 를 본다.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            seed_sample_lots: false,
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{:<12} --> 잘못된 설정값 {}={:?}, 기본값 사용", "Config", key, raw);
            default
        }),
        Err(_) => default,
    }
}

// endregion: --- Config

// endregion: --- Tests
