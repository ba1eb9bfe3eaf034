//! Inkstone Data Models
//!
//! REST API의 JSON 스키마와 매핑되는 Rust 데이터 모델.
//! 타임스탬프는 전부 epoch millis(i64)이며 레포지토리 계층에서만 기록합니다.

use serde::{Deserialize, Serialize};

/// 소설 프로젝트 (모든 하위 엔티티의 소유 루트)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// 등장인물
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub relationships: Option<String>,
    pub appearance: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// 챕터
///
/// `word_count`는 content의 공백 제외 글자 수로, 쓰기 시마다 서버에서 재계산합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "orderIndex")]
    pub order_index: i64,
    pub status: String,
    #[serde(rename = "wordCount")]
    pub word_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// 세계관 설정 요소
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldElement {
    pub id: i64,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    #[serde(rename = "type")]
    pub element_type: String,
    pub name: String,
    pub description: Option<String>,
    pub details: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// 스토리 구조 항목 (플롯 포인트 / 아크 / 타임라인)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryStructure {
    pub id: i64,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "orderIndex")]
    pub order_index: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// 프로젝트 컨텍스트 스냅샷 (비영속, 요청 시점 조립)
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub project: Project,
    pub characters: Vec<Character>,
    pub chapters: Vec<Chapter>,
    #[serde(rename = "worldBuilding")]
    pub world_building: Vec<WorldElement>,
    pub structure: Vec<StoryStructure>,
    /// 어시스턴트 프롬프트 조립 시에만 지정됨
    #[serde(rename = "currentChapter", skip_serializing_if = "Option::is_none")]
    pub current_chapter: Option<Chapter>,
}

/// 챕터 집계 통계 (쿼리 시점 계산, 캐시 없음)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectStats {
    #[serde(rename = "totalChapters")]
    pub total_chapters: i64,
    #[serde(rename = "totalWords")]
    pub total_words: i64,
    #[serde(rename = "publishedChapters")]
    pub published_chapters: i64,
    #[serde(rename = "draftChapters")]
    pub draft_chapters: i64,
}

/// 세계관 타입별 개수 요약
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WorldTypeCount {
    #[serde(rename = "type")]
    pub element_type: String,
    pub count: i64,
}

/// 어시스턴트 대화 턴 (세션별 인메모리 히스토리, 프로세스 수명)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub ai: String,
    pub timestamp: String,
}
