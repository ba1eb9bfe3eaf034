//! HTTP API Layer
//!
//! REST 라우팅과 요청/응답 변환만 담당하는 얇은 계층.
//! 비즈니스 로직은 레포지토리/집계/어시스턴트 모듈에 있습니다.

pub mod ai;
pub mod chapters;
pub mod characters;
pub mod projects;
pub mod world;

use std::sync::MutexGuard;

use actix_web::web;

use crate::ai::Assistant;
use crate::db::{Database, DbState};
use crate::error::AppError;

/// 애플리케이션 공유 상태 (main에서 한 번 생성, 전역 싱글턴 없음)
pub struct AppState {
    db: DbState,
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(db: Database, assistant: Assistant) -> Self {
        Self {
            db: DbState(std::sync::Mutex::new(db)),
            assistant,
        }
    }

    /// DB 락 획득. 가드는 await 지점을 넘기기 전에 반드시 drop할 것.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, AppError> {
        self.db.0.lock().map_err(|_| AppError::Lock)
    }
}

/// 전체 REST 라우트 등록
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(projects::scope())
        .service(characters::scope())
        .service(chapters::scope())
        .service(world::scope())
        .service(ai::scope());
}
