//! World Building API

use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use serde_json::json;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::repo::world::{self, NewWorldElement, WorldElementUpdate};

pub fn scope() -> Scope {
    web::scope("/api/world")
        .service(list)
        .service(create)
        .service(summary)
        .service(by_type)
        .service(by_project)
        .service(get)
        .service(update)
        .service(remove)
}

#[get("")]
async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(world::find_all(&db)?))
}

#[post("")]
async fn create(
    state: web::Data<AppState>,
    payload: web::Json<NewWorldElement>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let id = world::create(&db, &payload)?;
    let created = world::find_by_id(&db, id)?.ok_or(AppError::NotFound("World building element"))?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/project/{project_id}/summary")]
async fn summary(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(world::types_summary(&db, path.into_inner())?))
}

#[get("/project/{project_id}/type/{element_type}")]
async fn by_type(
    state: web::Data<AppState>,
    path: web::Path<(i64, String)>,
) -> AppResult<HttpResponse> {
    let (project_id, element_type) = path.into_inner();
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(world::find_by_type(&db, project_id, &element_type)?))
}

#[get("/project/{project_id}")]
async fn by_project(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(world::find_by_project(&db, path.into_inner())?))
}

#[get("/{id}")]
async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let found = world::find_by_id(&db, path.into_inner())?
        .ok_or(AppError::NotFound("World building element"))?;
    Ok(HttpResponse::Ok().json(found))
}

#[put("/{id}")]
async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<WorldElementUpdate>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let updated = world::update(&db, path.into_inner(), &payload)?
        .ok_or(AppError::NotFound("World building element"))?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
async fn remove(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    world::delete(&db, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "World building element deleted successfully" })))
}
