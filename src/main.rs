// region:    --- Imports
use fruitbid_market::catalog::commands::seed_sample_lots;
use fruitbid_market::config::Config;
use fruitbid_market::database::DatabaseManager;
use fruitbid_market::handlers;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env();
    info!("{:<12} --> 설정: {:?}", "Main", config);

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new(&config).await?);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    if config.seed_sample_lots {
        let seeded = seed_sample_lots(&db_manager).await?;
        info!("{:<12} --> 샘플 로트 {}개 시드", "Main", seeded);
    }

    let routes_all = handlers::routes(db_manager);

    let listener = TcpListener::bind(config.listen_addr.as_str()).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
