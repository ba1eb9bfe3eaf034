//! WorldBuilding Repository
//!
//! 세계관 설정 요소. type 판별자는 네 가지 값으로 제한되며
//! 저장 전에 검증합니다 (유효하지 않은 값은 행을 쓰지 않음).

use rusqlite::{params, Row};
use serde::Deserialize;

use super::now_millis;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{WorldElement, WorldTypeCount};

/// 허용되는 type 판별자
pub const VALID_TYPES: [&str; 4] = ["location", "culture", "rule", "organization"];

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorldElement {
    pub project_id: Option<i64>,
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldElementUpdate {
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
}

const COLUMNS: &str = "id, project_id, type, name, description, details, created_at, updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<WorldElement> {
    Ok(WorldElement {
        id: row.get(0)?,
        project_id: row.get(1)?,
        element_type: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        details: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn validate_type(element_type: &str) -> AppResult<()> {
    if VALID_TYPES.contains(&element_type) {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Invalid type. Must be one of: {}",
        VALID_TYPES.join(", ")
    )))
}

pub fn create(db: &Database, fields: &NewWorldElement) -> AppResult<i64> {
    let message = "Project ID, type, and name are required";
    let project_id = fields
        .project_id
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    let element_type = fields
        .element_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    let name = fields
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    validate_type(element_type)?;

    let now = now_millis();
    let result = db.execute(
        "INSERT INTO world_building
            (project_id, type, name, description, details, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            project_id,
            element_type,
            name,
            fields.description,
            fields.details,
            now,
            now
        ],
    )?;
    Ok(result.inserted_id)
}

pub fn find_by_id(db: &Database, id: i64) -> AppResult<Option<WorldElement>> {
    db.fetch_one(
        &format!("SELECT {COLUMNS} FROM world_building WHERE id = ?1"),
        [id],
        map_row,
    )
}

pub fn find_all(db: &Database) -> AppResult<Vec<WorldElement>> {
    db.fetch_all(
        &format!("SELECT {COLUMNS} FROM world_building ORDER BY type, created_at, id"),
        [],
        map_row,
    )
}

/// 프로젝트별 설정 요소 (type, 등록 순)
pub fn find_by_project(db: &Database, project_id: i64) -> AppResult<Vec<WorldElement>> {
    db.fetch_all(
        &format!(
            "SELECT {COLUMNS} FROM world_building WHERE project_id = ?1 ORDER BY type, created_at, id"
        ),
        [project_id],
        map_row,
    )
}

pub fn find_by_type(
    db: &Database,
    project_id: i64,
    element_type: &str,
) -> AppResult<Vec<WorldElement>> {
    db.fetch_all(
        &format!(
            "SELECT {COLUMNS} FROM world_building
             WHERE project_id = ?1 AND type = ?2 ORDER BY created_at, id"
        ),
        params![project_id, element_type],
        map_row,
    )
}

pub fn update(db: &Database, id: i64, fields: &WorldElementUpdate) -> AppResult<Option<WorldElement>> {
    let message = "Type and name are required";
    let element_type = fields
        .element_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    let name = fields
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    validate_type(element_type)?;

    let result = db.execute(
        "UPDATE world_building
         SET type = ?1, name = ?2, description = ?3, details = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            element_type,
            name,
            fields.description,
            fields.details,
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
    db.execute("DELETE FROM world_building WHERE id = ?1", [id])?;
    Ok(())
}

/// type별 개수 요약 (type 오름차순)
pub fn types_summary(db: &Database, project_id: i64) -> AppResult<Vec<WorldTypeCount>> {
    db.fetch_all(
        "SELECT type, COUNT(*) FROM world_building
         WHERE project_id = ?1 GROUP BY type ORDER BY type",
        [project_id],
        |row| {
            Ok(WorldTypeCount {
                element_type: row.get(0)?,
                count: row.get(1)?,
            })
        },
    )
}

#[cfg(test)]
pub(crate) fn fixture(db: &Database, project_id: i64, element_type: &str, name: &str) -> i64 {
    create(
        db,
        &NewWorldElement {
            project_id: Some(project_id),
            element_type: Some(element_type.to_string()),
            name: Some(name.to_string()),
            description: None,
            details: None,
        },
    )
    .unwrap()
}
