//! Project Repository
//!
//! 프로젝트는 모든 하위 엔티티의 소유 루트입니다. 삭제 시 하위 행을
//! 하나의 트랜잭션으로 함께 삭제합니다 (명시적 캐스케이드).

use rusqlite::{params, Row};
use serde::Deserialize;

use super::now_millis;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::Project;

/// 생성/수정 공통 입력 (수정은 전체 필드 덮어쓰기)
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

const COLUMNS: &str = "id, name, description, genre, created_at, updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        genre: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn required_name(fields: &ProjectFields) -> AppResult<&str> {
    fields
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Project name is required".to_string()))
}

pub fn create(db: &Database, fields: &ProjectFields) -> AppResult<i64> {
    let name = required_name(fields)?;
    let now = now_millis();
    let result = db.execute(
        "INSERT INTO projects (name, description, genre, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, fields.description, fields.genre, now, now],
    )?;
    Ok(result.inserted_id)
}

pub fn find_by_id(db: &Database, id: i64) -> AppResult<Option<Project>> {
    db.fetch_one(
        &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
        [id],
        map_row,
    )
}

/// 전체 프로젝트 목록 (최근 수정 순)
pub fn find_all(db: &Database) -> AppResult<Vec<Project>> {
    db.fetch_all(
        &format!("SELECT {COLUMNS} FROM projects ORDER BY updated_at DESC"),
        [],
        map_row,
    )
}

pub fn update(db: &Database, id: i64, fields: &ProjectFields) -> AppResult<Option<Project>> {
    let name = required_name(fields)?;
    let result = db.execute(
        "UPDATE projects SET name = ?1, description = ?2, genre = ?3, updated_at = ?4
         WHERE id = ?5",
        params![name, fields.description, fields.genre, now_millis(), id],
    )?;
    if result.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id)
}

/// 프로젝트와 소속 하위 행 전체를 삭제 (존재하지 않는 id는 no-op)
pub fn delete(db: &Database, id: i64) -> AppResult<()> {
    db.with_transaction(|tx| {
        tx.execute("DELETE FROM characters WHERE project_id = ?1", [id])?;
        tx.execute("DELETE FROM chapters WHERE project_id = ?1", [id])?;
        tx.execute("DELETE FROM world_building WHERE project_id = ?1", [id])?;
        tx.execute("DELETE FROM story_structure WHERE project_id = ?1", [id])?;
        tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        Ok(())
    })
}

#[cfg(test)]
pub(crate) fn fixture(db: &Database, name: &str) -> i64 {
    create(
        db,
        &ProjectFields {
            name: Some(name.to_string()),
            description: None,
            genre: None,
        },
    )
    .unwrap()
}
