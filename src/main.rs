//! Inkstone 서버 엔트리포인트
//!
//! .env 로드 → 로깅 초기화 → DB 오픈/스키마 초기화 → HTTP 서버 기동.
//! DB 연결 실패는 기동 실패, GEMINI_API_KEY 부재는 어시스턴트 저하로만 처리.

use std::path::PathBuf;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inkstone::ai::Assistant;
use inkstone::api::{self, AppState};
use inkstone::db::Database;

const DEFAULT_DB_PATH: &str = "database/app.db";
const DEFAULT_PORT: u16 = 3000;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // production에서는 .env가 없을 수 있으므로 실패해도 무시
    let _ = dotenvy::dotenv();

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let db_path = std::env::var("INKSTONE_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(&db_path)
        .map_err(|e| std::io::Error::other(format!("failed to open database: {e}")))?;
    db.initialize()
        .map_err(|e| std::io::Error::other(format!("failed to initialize database: {e}")))?;
    info!(path = %db_path.display(), "database ready");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = web::Data::new(AppState::new(db, Assistant::from_env()));

    info!(port, "Inkstone server running");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
