//! Characters API

use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use serde_json::json;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::repo::character::{self, CharacterUpdate, NewCharacter};

pub fn scope() -> Scope {
    web::scope("/api/characters")
        .service(list)
        .service(create)
        .service(by_project)
        .service(get)
        .service(update)
        .service(remove)
}

#[get("")]
async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(character::find_all(&db)?))
}

#[post("")]
async fn create(
    state: web::Data<AppState>,
    payload: web::Json<NewCharacter>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let id = character::create(&db, &payload)?;
    let created = character::find_by_id(&db, id)?.ok_or(AppError::NotFound("Character"))?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/project/{project_id}")]
async fn by_project(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    Ok(HttpResponse::Ok().json(character::find_by_project(&db, path.into_inner())?))
}

#[get("/{id}")]
async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let found = character::find_by_id(&db, path.into_inner())?
        .ok_or(AppError::NotFound("Character"))?;
    Ok(HttpResponse::Ok().json(found))
}

#[put("/{id}")]
async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<CharacterUpdate>,
) -> AppResult<HttpResponse> {
    let db = state.db()?;
    let updated = character::update(&db, path.into_inner(), &payload)?
        .ok_or(AppError::NotFound("Character"))?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
async fn remove(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let db = state.db()?;
    character::delete(&db, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Character deleted successfully" })))
}
