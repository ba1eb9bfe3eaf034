//! Project Context Aggregator
//!
//! 프로젝트와 소속 엔티티 전체를 하나의 스냅샷으로 조립합니다.
//! 네 번의 독립적인 읽기로 구성되며 읽기 간 원자성은 보장하지 않습니다
//! (소비처인 API 응답과 어시스턴트 프롬프트는 staleness를 허용).

use crate::db::Database;
use crate::error::AppResult;
use crate::models::ProjectContext;
use crate::repo;

/// 프로젝트 컨텍스트 조회. 프로젝트가 없으면 None.
pub fn project_context(db: &Database, project_id: i64) -> AppResult<Option<ProjectContext>> {
    let Some(project) = repo::project::find_by_id(db, project_id)? else {
        return Ok(None);
    };

    let characters = repo::character::find_by_project(db, project_id)?;
    let chapters = repo::chapter::find_by_project(db, project_id)?;
    let world_building = repo::world::find_by_project(db, project_id)?;
    let structure = repo::structure::find_by_project(db, project_id)?;

    Ok(Some(ProjectContext {
        project,
        characters,
        chapters,
        world_building,
        structure,
        current_chapter: None,
    }))
}
