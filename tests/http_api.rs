//! REST API 통합 테스트
//!
//! 인메모리 SQLite + 자격 증명 없는 어시스턴트로 전체 라우팅을 검증합니다.

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use inkstone::ai::Assistant;
use inkstone::api::{self, AppState};
use inkstone::db::Database;

fn test_state() -> web::Data<AppState> {
    let db = Database::in_memory().unwrap();
    db.initialize().unwrap();
    let assistant = Assistant::new(None, "gemini-pro".to_string());
    web::Data::new(AppState::new(db, assistant))
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(api::configure),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $path:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($path)
            .set_json($body)
            .to_request();
        test::call_service($app, req).await
    }};
}

macro_rules! get_json {
    ($app:expr, $path:expr) => {{
        let req = test::TestRequest::get().uri($path).to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        body
    }};
}

macro_rules! create_project {
    ($app:expr, $name:expr) => {{
        let resp = post_json!($app, "/api/projects", json!({ "name": $name }));
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["id"].as_i64().unwrap()
    }};
}

async fn body_json(resp: ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_project_crud_flow() {
    let state = test_state();
    let app = test_app!(state);

    // 필수 필드 누락 → 400
    let resp = post_json!(&app, "/api/projects", json!({ "description": "无名" }));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(
        &app,
        "/api/projects",
        json!({ "name": "江湖路", "genre": "武侠" })
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "江湖路");
    assert!(created["createdAt"].as_i64().unwrap() > 0);

    // 단건 조회는 전체 컨텍스트를 돌려준다
    let context = get_json!(&app, &format!("/api/projects/{id}"));
    assert_eq!(context["project"]["id"], id);
    assert_eq!(context["characters"], json!([]));
    assert_eq!(context["chapters"], json!([]));
    assert_eq!(context["worldBuilding"], json!([]));
    assert_eq!(context["structure"], json!([]));

    // 알 수 없는 id → 404
    let req = test::TestRequest::get().uri("/api/projects/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/api/projects/{id}"))
        .set_json(json!({ "name": "江湖路 (改)" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["name"], "江湖路 (改)");
    // 전체 필드 덮어쓰기: genre 누락 → 비워짐
    assert_eq!(updated["genre"], Value::Null);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/projects/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Project deleted successfully");

    let list = get_json!(&app, "/api/projects");
    assert_eq!(list, json!([]));
}

#[actix_web::test]
async fn test_chapter_lifecycle_over_http() {
    let state = test_state();
    let app = test_app!(state);
    let pid = create_project!(&app, "长篇");

    // order_index 자동 부여
    let resp = post_json!(
        &app,
        "/api/chapters",
        json!({ "project_id": pid, "title": "第一章", "content": "你好 世界" })
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first = body_json(resp).await;
    assert_eq!(first["orderIndex"], 1);
    assert_eq!(first["wordCount"], 4);
    assert_eq!(first["status"], "draft");

    let resp = post_json!(
        &app,
        "/api/chapters",
        json!({ "project_id": pid, "title": "第二章" })
    );
    let second = body_json(resp).await;
    assert_eq!(second["orderIndex"], 2);
    let second_id = second["id"].as_i64().unwrap();

    // word_count는 호출자 입력을 무시하고 서버에서 파생
    let req = test::TestRequest::put()
        .uri(&format!("/api/chapters/{second_id}"))
        .set_json(json!({
            "title": "第二章",
            "content": "风起 于 青萍之末",
            "status": "published",
            "word_count": 9999
        }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["wordCount"], 7);
    assert_eq!(updated["status"], "published");

    // 순서 변경 (형제와 중복 인덱스 허용)
    let req = test::TestRequest::put()
        .uri(&format!("/api/chapters/{second_id}/order"))
        .set_json(json!({ "order_index": 1 }))
        .to_request();
    let moved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(moved["orderIndex"], 1);

    // order_index 누락 → 400
    let req = test::TestRequest::put()
        .uri(&format!("/api/chapters/{second_id}/order"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 통계
    let stats = get_json!(&app, &format!("/api/chapters/project/{pid}/stats"));
    assert_eq!(stats["totalChapters"], 2);
    assert_eq!(stats["totalWords"], 11);
    assert_eq!(stats["publishedChapters"], 1);
    assert_eq!(stats["draftChapters"], 1);

    // 알 수 없는 챕터 수정 → 404
    let req = test::TestRequest::put()
        .uri("/api/chapters/999")
        .set_json(json!({ "title": "无" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_world_building_type_validation() {
    let state = test_state();
    let app = test_app!(state);
    let pid = create_project!(&app, "玄幻");

    let resp = post_json!(
        &app,
        "/api/world",
        json!({ "project_id": pid, "type": "kingdom", "name": "大梁" })
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(
        body["error"],
        "Invalid type. Must be one of: location, culture, rule, organization"
    );

    // 거부된 요청은 행을 쓰지 않음
    let list = get_json!(&app, &format!("/api/world/project/{pid}"));
    assert_eq!(list, json!([]));

    let resp = post_json!(
        &app,
        "/api/world",
        json!({ "project_id": pid, "type": "location", "name": "青云山" })
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let summary = get_json!(&app, &format!("/api/world/project/{pid}/summary"));
    assert_eq!(summary, json!([{ "type": "location", "count": 1 }]));

    let by_type = get_json!(&app, &format!("/api/world/project/{pid}/type/location"));
    assert_eq!(by_type[0]["name"], "青云山");
}

#[actix_web::test]
async fn test_context_endpoint_scopes_and_orders() {
    let state = test_state();
    let app = test_app!(state);
    let pid = create_project!(&app, "主项目");
    let other = create_project!(&app, "别的项目");

    for name in ["郭靖", "黄蓉"] {
        let resp = post_json!(
            &app,
            "/api/characters",
            json!({ "project_id": pid, "name": name })
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    post_json!(
        &app,
        "/api/characters",
        json!({ "project_id": other, "name": "别人" })
    );

    for (title, index) in [("第二章", 2), ("第一章", 1), ("第三章", 3)] {
        post_json!(
            &app,
            "/api/chapters",
            json!({ "project_id": pid, "title": title, "order_index": index })
        );
    }
    post_json!(
        &app,
        "/api/world",
        json!({ "project_id": pid, "type": "location", "name": "桃花岛" })
    );

    let context = get_json!(&app, &format!("/api/projects/{pid}"));
    assert_eq!(context["characters"].as_array().unwrap().len(), 2);
    assert_eq!(context["worldBuilding"].as_array().unwrap().len(), 1);
    let titles: Vec<&str> = context["chapters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["第一章", "第二章", "第三章"]);
}

#[actix_web::test]
async fn test_ai_chat_fails_soft_without_credential() {
    let state = test_state();
    let app = test_app!(state);

    // message 누락 → 400
    let resp = post_json!(&app, "/api/ai/chat", json!({ "sessionId": "s1" }));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 자격 증명 없음 → 500이 아니라 고정 안내문을 담은 200
    let resp = post_json!(
        &app,
        "/api/ai/chat",
        json!({ "message": "主角该怎么办？", "sessionId": "s1" })
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["response"], "抱歉，AI助手暂时不可用。请检查API配置。");

    // 저하 응답은 히스토리에 기록되지 않음
    let history = get_json!(&app, "/api/ai/history/s1");
    assert_eq!(history, json!([]));

    let req = test::TestRequest::delete()
        .uri("/api/ai/history/s1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await["message"],
        "Conversation history cleared"
    );
}

#[actix_web::test]
async fn test_ai_suggest_and_dialogue_validation() {
    let state = test_state();
    let app = test_app!(state);
    let pid = create_project!(&app, "武侠");

    // content 누락 → 400
    let resp = post_json!(&app, "/api/ai/suggest", json!({ "type": "continue" }));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(
        &app,
        "/api/ai/suggest",
        json!({ "content": "少年提剑下山。", "projectId": pid })
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["type"], "continue");
    assert!(body["suggestions"].as_str().unwrap().starts_with("抱歉"));

    // 필수 필드 누락 → 400
    let resp = post_json!(&app, "/api/ai/dialogue", json!({ "situation": "决斗" }));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 알 수 없는 프로젝트 → 404
    let resp = post_json!(
        &app,
        "/api/ai/dialogue",
        json!({ "characterId": 1, "situation": "决斗", "projectId": 999 })
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 프로젝트는 있지만 캐릭터가 없음 → 404
    let resp = post_json!(
        &app,
        "/api/ai/dialogue",
        json!({ "characterId": 42, "situation": "决斗", "projectId": pid })
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
