//! Character Repository
//!
//! 등장인물. 자유 텍스트 필드만 갖고 엔티티 간 교차 검증은 없습니다.

use rusqlite::{params, Row};
use serde::Deserialize;

use super::now_millis;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::Character;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCharacter {
    pub project_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub relationships: Option<String>,
    pub appearance: Option<String>,
}

/// 수정 입력 (project_id는 이동 불가, 전체 필드 덮어쓰기)
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub relationships: Option<String>,
    pub appearance: Option<String>,
}

const COLUMNS: &str = "id, project_id, name, description, personality, background, \
                       relationships, appearance, created_at, updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        personality: row.get(4)?,
        background: row.get(5)?,
        relationships: row.get(6)?,
        appearance: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn required_name(name: Option<&str>, message: &str) -> AppResult<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

pub fn create(db: &Database, fields: &NewCharacter) -> AppResult<i64> {
    let project_id = fields.project_id.ok_or_else(|| {
        AppError::Validation("Project ID and character name are required".to_string())
    })?;
    let name = required_name(
        fields.name.as_deref(),
        "Project ID and character name are required",
    )?;

    let now = now_millis();
    let result = db.execute(
        "INSERT INTO characters
            (project_id, name, description, personality, background, relationships,
             appearance, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            project_id,
            name,
            fields.description,
            fields.personality,
            fields.background,
            fields.relationships,
            fields.appearance,
            now,
            now
        ],
    )?;
    Ok(result.inserted_id)
}

pub fn find_by_id(db: &Database, id: i64) -> AppResult<Option<Character>> {
    db.fetch_one(
        &format!("SELECT {COLUMNS} FROM characters WHERE id = ?1"),
        [id],
        map_row,
    )
}

pub fn find_all(db: &Database) -> AppResult<Vec<Character>> {
    db.fetch_all(
        &format!("SELECT {COLUMNS} FROM characters ORDER BY created_at, id"),
        [],
        map_row,
    )
}

/// 프로젝트별 등장인물 (등록 순)
pub fn find_by_project(db: &Database, project_id: i64) -> AppResult<Vec<Character>> {
    db.fetch_all(
        &format!(
            "SELECT {COLUMNS} FROM characters WHERE project_id = ?1 ORDER BY created_at, id"
        ),
        [project_id],
        map_row,
    )
}

pub fn update(db: &Database, id: i64, fields: &CharacterUpdate) -> AppResult<Option<Character>> {
    let name = required_name(fields.name.as_deref(), "Character name is required")?;
    let result = db.execute(
        "UPDATE characters
         SET name = ?1, description = ?2, personality = ?3, background = ?4,
             relationships = ?5, appearance = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            name,
            fields.description,
            fields.personality,
            fields.background,
            fields.relationships,
            fields.appearance,
            now_millis(),
            id
        ],
    )?;
    if result.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id)
}

pub fn delete(db: &Database, id: i64) -> AppResult<()> {
    db.execute("DELETE FROM characters WHERE id = ?1", [id])?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn fixture(db: &Database, project_id: i64, name: &str) -> i64 {
    create(
        db,
        &NewCharacter {
            project_id: Some(project_id),
            name: Some(name.to_string()),
            description: None,
            personality: None,
            background: None,
            relationships: None,
            appearance: None,
        },
    )
    .unwrap()
}
