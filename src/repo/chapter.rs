//! Chapter Repository
//!
//! 챕터 생명주기 관리. 이 모듈이 책임지는 불변식:
//! - `order_index` 미지정 생성 시 `1 + max(order_index)` 자동 부여
//!   (삭제 시 재번호 없음, 빈 구간/중복 허용)
//! - `word_count`는 content의 공백 제외 글자 수로 항상 서버에서 파생

use rusqlite::{params, Row};
use serde::Deserialize;

use super::now_millis;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Chapter, ProjectStats};

#[derive(Debug, Clone, Deserialize)]
pub struct NewChapter {
    pub project_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub order_index: Option<i64>,
}

/// 수정 입력 (전체 필드 덮어쓰기, word_count는 입력받지 않음)
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
}

const COLUMNS: &str = "id, project_id, title, content, summary, order_index, status, \
                       word_count, created_at, updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        summary: row.get(4)?,
        order_index: row.get(5)?,
        status: row.get(6)?,
        word_count: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// 공백을 제외한 글자 수 (단어 아님 - 중문 원고 기준)
pub fn word_count(content: &str) -> i64 {
    content.chars().filter(|c| !c.is_whitespace()).count() as i64
}

fn required_title(title: Option<&str>, message: &str) -> AppResult<String> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

fn next_order_index(db: &Database, project_id: i64) -> AppResult<i64> {
    let max = db.fetch_one(
        "SELECT MAX(order_index) FROM chapters WHERE project_id = ?1",
        [project_id],
        |row| row.get::<_, Option<i64>>(0),
    )?;
    Ok(max.flatten().unwrap_or(0) + 1)
}

pub fn create(db: &Database, fields: &NewChapter) -> AppResult<i64> {
    let project_id = fields.project_id.ok_or_else(|| {
        AppError::Validation("Project ID and chapter title are required".to_string())
    })?;
    let title = required_title(
        fields.title.as_deref(),
        "Project ID and chapter title are required",
    )?;

    let order_index = match fields.order_index {
        Some(index) => index,
        None => next_order_index(db, project_id)?,
    };
    let word_count = fields.content.as_deref().map(word_count).unwrap_or(0);

    let now = now_millis();
    let result = db.execute(
        "INSERT INTO chapters
            (project_id, title, content, summary, order_index, word_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            project_id,
            title,
            fields.content,
            fields.summary,
            order_index,
            word_count,
            now,
            now
        ],
    )?;
    Ok(result.inserted_id)
}

pub fn find_by_id(db: &Database, id: i64) -> AppResult<Option<Chapter>> {
    db.fetch_one(
        &format!("SELECT {COLUMNS} FROM chapters WHERE id = ?1"),
        [id],
        map_row,
    )
}

pub fn find_all(db: &Database) -> AppResult<Vec<Chapter>> {
    db.fetch_all(
        &format!("SELECT {COLUMNS} FROM chapters ORDER BY project_id, order_index, id"),
        [],
        map_row,
    )
}

/// 프로젝트별 챕터 (order_index 오름차순)
pub fn find_by_project(db: &Database, project_id: i64) -> AppResult<Vec<Chapter>> {
    db.fetch_all(
        &format!(
            "SELECT {COLUMNS} FROM chapters WHERE project_id = ?1 ORDER BY order_index, id"
        ),
        [project_id],
        map_row,
    )
}

pub fn update(db: &Database, id: i64, fields: &ChapterUpdate) -> AppResult<Option<Chapter>> {
    let title = required_title(fields.title.as_deref(), "Chapter title is required")?;
    let word_count = fields.content.as_deref().map(word_count).unwrap_or(0);
    let status = fields.status.as_deref().unwrap_or("draft");

    let result = db.execute(
        "UPDATE chapters
         SET title = ?1, content = ?2, summary = ?3, status = ?4, word_count = ?5,
             updated_at = ?6
         WHERE id = ?7",
        params![
            title,
            fields.content,
            fields.summary,
            status,
            word_count,
            now_millis(),
            id
        ],
    )?;
    if result.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id)
}

/// 표시 순서만 변경. 형제 챕터와의 중복 인덱스는 허용됩니다.
pub fn update_order(db: &Database, id: i64, new_index: i64) -> AppResult<Option<Chapter>> {
    let result = db.execute(
        "UPDATE chapters SET order_index = ?1, updated_at = ?2 WHERE id = ?3",
        params![new_index, now_millis(), id],
    )?;
    if result.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id)
}

pub fn delete(db: &Database, id: i64) -> AppResult<()> {
    db.execute("DELETE FROM chapters WHERE id = ?1", [id])?;
    Ok(())
}

/// 챕터 집계 통계 (쿼리 시점 계산)
pub fn project_stats(db: &Database, project_id: i64) -> AppResult<ProjectStats> {
    let stats = db.fetch_one(
        "SELECT
            COUNT(*),
            COALESCE(SUM(word_count), 0),
            COUNT(CASE WHEN status = 'published' THEN 1 END),
            COUNT(CASE WHEN status = 'draft' THEN 1 END)
         FROM chapters
         WHERE project_id = ?1",
        [project_id],
        |row| {
            Ok(ProjectStats {
                total_chapters: row.get(0)?,
                total_words: row.get(1)?,
                published_chapters: row.get(2)?,
                draft_chapters: row.get(3)?,
            })
        },
    )?;

    // 집계 쿼리는 항상 한 행을 돌려주지만, 계약상 기본값으로 방어
    Ok(stats.unwrap_or(ProjectStats {
        total_chapters: 0,
        total_words: 0,
        published_chapters: 0,
        draft_chapters: 0,
    }))
}

#[cfg(test)]
pub(crate) fn fixture(db: &Database, project_id: i64, title: &str) -> i64 {
    create(
        db,
        &NewChapter {
            project_id: Some(project_id),
            title: Some(title.to_string()),
            content: None,
            summary: None,
            order_index: None,
        },
    )
    .unwrap()
}
