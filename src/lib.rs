//! Inkstone - 웹소설 집필 관리 백엔드 라이브러리
//!
//! 프로젝트/등장인물/챕터/세계관/스토리 구조를 SQLite에 저장하고
//! REST API로 노출하며, Gemini 기반 집필 어시스턴트를 연동합니다.

pub mod ai;
pub mod api;
pub mod context;
pub mod db;
pub mod error;
pub mod models;
pub mod repo;
