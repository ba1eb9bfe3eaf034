//! Chapters API
//!
//! 순서 변경 전용 엔드포인트와 프로젝트 통계 엔드포인트를 포함합니다.

use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::repo::chapter::{self, ChapterUpdate, NewChapter};

#[derive(Debug, Deserialize)]
pub struct OrderPayload {
    pub order_index: Option<i64>,
}

pub fn scope() -> Scope {
    web::scope("/api/chapters")
        .service(list)
        .service(create)
        .service(stats)
        .service(by_project)
        .service(update_order)
        .service(get)
        .service(update)
        .service(remove)
}

#[get("")]
async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(chapter::find_all(&db)?))
}

#[post("")]
async fn create(
    state: web::Data<AppState>,
    payload: web::Json<NewChapter>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let id = chapter::create(&db, &payload)?;
    let created = chapter::find_by_id(&db, id)?.ok_or(AppError::NotFound("Chapter"))?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/project/{project_id}/stats")]
async fn stats(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(chapter::project_stats(&db, path.into_inner())?))
}

#[get("/project/{project_id}")]
async fn by_project(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(chapter::find_by_project(&db, path.into_inner())?))
}

#[get("/{id}")]
async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let found =
        chapter::find_by_id(&db, path.into_inner())?.ok_or(AppError::NotFound("Chapter"))?;
    Ok(HttpResponse::Ok().json(found))
}

#[put("/{id}")]
async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<ChapterUpdate>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let updated = chapter::update(&db, path.into_inner(), &payload)?
        .ok_or(AppError::NotFound("Chapter"))?;
    Ok(HttpResponse::Ok().json(updated))
}

#[put("/{id}/order")]
async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<OrderPayload>,
) -> AppResult<HttpResponse> {
    let order_index = payload
        .order_index
        .ok_or_else(|| AppError::Validation("Order index is required".to_string()))?;
    let db = state.db()?;
    let updated = chapter::update_order(&db, path.into_inner(), order_index)?
        .ok_or(AppError::NotFound("Chapter"))?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
async fn remove(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    chapter::delete(&db, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Chapter deleted successfully" })))
}
