//! Entity Repositories
//!
//! 엔티티별 레포지토리 모듈. 영속성 게이트웨이 위에서 엔티티 불변식
//! (필수 필드 검증, 파생 word_count, order_index 자동 부여)을 책임집니다.
//!
//! 공통 계약:
//! - `update`/`delete`는 존재하지 않는 id에 대해 에러가 아님
//!   (update는 None, delete는 no-op 성공)
//! - 타임스탬프는 레포지토리에서만 기록하며 호출자 입력을 받지 않음

pub mod chapter;
pub mod character;
pub mod project;
pub mod structure;
pub mod world;

/// 현재 시각 (epoch millis)
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
