//! Projects API
//!
//! 단건 조회는 행이 아니라 전체 ProjectContext를 돌려줍니다.

use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use serde_json::json;

use super::AppState;
use crate::context;
use crate::error::{AppError, AppResult};
use crate::repo::project::{self, ProjectFields};

pub fn scope() -> Scope {
    web::scope("/api/projects")
        .service(list)
        .service(create)
        .service(get_context)
        .service(update)
        .service(remove)
}

/// 전체 프로젝트 목록 (최근 수정 순)
#[get("")]
async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(project::find_all(&db)?))
}

#[post("")]
async fn create(
    state: web::Data<AppState>,
    payload: web::Json<ProjectFields>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let id = project::create(&db, &payload)?;
    let created = project::find_by_id(&db, id)?.ok_or(AppError::NotFound("Project"))?;
    tracing::info!(project_id = id, "project created");
    Ok(HttpResponse::Created().json(created))
}

/// 프로젝트 + 소속 엔티티 전체 스냅샷
#[get("/{id}")]
async fn get_context(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let context = context::project_context(&db, path.into_inner())?
        .ok_or(AppError::NotFound("Project"))?;
    Ok(HttpResponse::Ok().json(context))
}

#[put("/{id}")]
async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<ProjectFields>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let updated = project::update(&db, path.into_inner(), &payload)?
        .ok_or(AppError::NotFound("Project"))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// 프로젝트와 소속 데이터 전체 삭제
#[delete("/{id}")]
async fn remove(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let db = state.db()?;
    project::delete(&db, id)?;
    tracing::info!(project_id = id, "project deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted successfully" })))
}
