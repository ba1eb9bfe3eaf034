//! AI Assistant API
//!
//! 어시스턴트 게이트웨이의 fail-soft 계약에 따라 생성 실패도 200으로
//! 내려갑니다. suggest/dialogue의 프롬프트 템플릿은 이 계층 소관입니다.

use actix_web::{delete, get, post, web, HttpResponse, Scope};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::ai::prompt::tail_chars;
use crate::context;
use crate::error::{AppError, AppResult};
use crate::models::ProjectContext;

const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<i64>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub suggestion_type: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<i64>,
    #[serde(rename = "chapterId")]
    pub chapter_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DialogueRequest {
    #[serde(rename = "characterId")]
    pub character_id: Option<i64>,
    pub situation: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<i64>,
}

pub fn scope() -> Scope {
    web::scope("/api/ai")
        .service(chat)
        .service(history_default)
        .service(history)
        .service(clear_history_default)
        .service(clear_history)
        .service(suggest)
        .service(dialogue)
}

/// 프로젝트 컨텍스트 로드 (락 가드는 이 함수 안에서만 유지)
fn load_context(
    state: &AppState,
    project_id: Option<i64>,
) -> AppResult<Option<ProjectContext>> {
    match project_id {
        Some(project_id) => {
            let db = state.db()?;
            context::project_context(&db, project_id)
        }
        None => Ok(None),
    }
}

#[post("/chat")]
async fn chat(state: web::Data<AppState>, payload: web::Json<ChatRequest>) -> AppResult<HttpResponse> {
    let message = payload
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?
        .to_string();

    let context = load_context(&state, payload.project_id)?;
    let session_id = payload
        .session_id
        .clone()
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let generation = state
        .assistant
        .generate(&message, context.as_ref(), &session_id)
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "response": generation.into_text(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

#[get("/history")]
async fn history_default(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.assistant.history(DEFAULT_SESSION)))
}

#[get("/history/{session_id}")]
async fn history(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.assistant.history(&path.into_inner())))
}

#[delete("/history")]
async fn clear_history_default(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state.assistant.clear_history(DEFAULT_SESSION);
    Ok(HttpResponse::Ok().json(json!({ "message": "Conversation history cleared" })))
}

#[delete("/history/{session_id}")]
async fn clear_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.assistant.clear_history(&path.into_inner());
    Ok(HttpResponse::Ok().json(json!({ "message": "Conversation history cleared" })))
}

#[post("/suggest")]
async fn suggest(
    state: web::Data<AppState>,
    payload: web::Json<SuggestRequest>,
) -> AppResult<HttpResponse> {
    let content = payload
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Content is required for suggestions".to_string()))?;

    let mut context = load_context(&state, payload.project_id)?;
    if let (Some(context), Some(chapter_id)) = (context.as_mut(), payload.chapter_id) {
        context.current_chapter = context
            .chapters
            .iter()
            .find(|chapter| chapter.id == chapter_id)
            .cloned();
    }

    let suggestion_type = payload
        .suggestion_type
        .clone()
        .unwrap_or_else(|| "continue".to_string());
    let prompt = match suggestion_type.as_str() {
        "continue" => format!(
            "请根据以下内容，提供2-3个可能的后续发展方向：\n\n{}",
            tail_chars(content, 500)
        ),
        "improve" => format!(
            "请对以下文字提供润色建议，使其更符合中国古典文学风格：\n\n{}",
            tail_chars(content, 300)
        ),
        "conflict" => format!(
            "基于当前情节，建议一些可能的冲突或转折点：\n\n{}",
            tail_chars(content, 500)
        ),
        _ => format!("对这段内容有什么建议？\n\n{}", tail_chars(content, 300)),
    };

    // 제안 호출은 본 대화와 섞이지 않게 일회성 세션 사용
    let session_id = format!("suggestion_{}", uuid::Uuid::new_v4());
    let generation = state
        .assistant
        .generate(&prompt, context.as_ref(), &session_id)
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "suggestions": generation.into_text(),
        "type": suggestion_type,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

#[post("/dialogue")]
async fn dialogue(
    state: web::Data<AppState>,
    payload: web::Json<DialogueRequest>,
) -> AppResult<HttpResponse> {
    let message = "Character ID and situation are required";
    let character_id = payload
        .character_id
        .ok_or_else(|| AppError::Validation(message.to_string()))?;
    let situation = payload
        .situation
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))?
        .to_string();

    let context = load_context(&state, payload.project_id)?
        .ok_or(AppError::NotFound("Project or characters"))?;
    let character = context
        .characters
        .iter()
        .find(|character| character.id == character_id)
        .cloned()
        .ok_or(AppError::NotFound("Character"))?;

    let prompt = format!(
        "请根据角色{name}的性格特点，为以下情况生成合适的对话：\n\n\
         角色信息：\n\
         - 姓名：{name}\n\
         - 性格：{personality}\n\
         - 背景：{background}\n\
         - 外貌：{appearance}\n\n\
         情况：{situation}\n\n\
         请生成符合这个角色性格的对话，包括语言风格、用词习惯等。",
        name = character.name,
        personality = character.personality.as_deref().unwrap_or("未设定"),
        background = character.background.as_deref().unwrap_or("未设定"),
        appearance = character.appearance.as_deref().unwrap_or("未设定"),
    );

    let session_id = format!("dialogue_{}", uuid::Uuid::new_v4());
    let generation = state
        .assistant
        .generate(&prompt, Some(&context), &session_id)
        .await;

    Ok(HttpResponse::Ok().json(json!({
        "dialogue": generation.into_text(),
        "character": character.name,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
