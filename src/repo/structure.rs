//! StoryStructure Repository
//!
//! 플롯 포인트 / 아크 / 타임라인 항목. 주 소비자는 컨텍스트 집계이며
//! 별도의 REST 리소스는 없습니다.

use rusqlite::{params, Row};
use serde::Deserialize;

use super::now_millis;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::StoryStructure;

#[derive(Debug, Clone, Deserialize)]
pub struct NewStructureItem {
    pub project_id: Option<i64>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order_index: Option<i64>,
}

const COLUMNS: &str = "id, project_id, type, title, description, order_index, created_at, updated_at";

fn map_row(row: &Row<'_>) -> rusqlite::Result<StoryStructure> {
    Ok(StoryStructure {
        id: row.get(0)?,
        project_id: row.get(1)?,
        item_type: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        order_index: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn create(db: &Database, fields: &NewStructureItem) -> AppResult<i64> {
    let message = "Project ID, type, and title are required";
    let project_id = fields
        .project_id
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    let item_type = fields
        .item_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    let title = fields
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?;

    let now = now_millis();
    let result = db.execute(
        "INSERT INTO story_structure
            (project_id, type, title, description, order_index, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            project_id,
            item_type,
            title,
            fields.description,
            fields.order_index.unwrap_or(0),
            now,
            now
        ],
    )?;
    Ok(result.inserted_id)
}

pub fn find_by_id(db: &Database, id: i64) -> AppResult<Option<StoryStructure>> {
    db.fetch_one(
        &format!("SELECT {COLUMNS} FROM story_structure WHERE id = ?1"),
        [id],
        map_row,
    )
}

/// 프로젝트별 구조 항목 (order_index 오름차순)
pub fn find_by_project(db: &Database, project_id: i64) -> AppResult<Vec<StoryStructure>> {
    db.fetch_all(
        &format!(
            "SELECT {COLUMNS} FROM story_structure WHERE project_id = ?1 ORDER BY order_index"
        ),
        [project_id],
        map_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::project;

    #[test]
    fn test_create_and_ordered_listing() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        let pid = project::fixture(&db, "三幕结构");

        let second = create(
            &db,
            &NewStructureItem {
                project_id: Some(pid),
                item_type: Some("plotpoint".to_string()),
                title: Some("高潮".to_string()),
                description: None,
                order_index: Some(2),
            },
        )
        .unwrap();
        let first = create(
            &db,
            &NewStructureItem {
                project_id: Some(pid),
                item_type: Some("arc".to_string()),
                title: Some("开端".to_string()),
                description: None,
                order_index: Some(1),
            },
        )
        .unwrap();

        let list = find_by_project(&db, pid).unwrap();
        assert_eq!(
            list.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert!(find_by_id(&db, first).unwrap().is_some());
    }
}
