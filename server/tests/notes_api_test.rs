//! ノートAPIの統合テスト
//!
//! ルーター全体（ミドルウェア込み）を`tower::ServiceExt::oneshot`で叩き、
//! HTTP契約（ステータス、エンベロープ、ワイヤ形式）を検証する。

mod support;

use axum::http::{header, Request, StatusCode};
use axum::{body::Body, Router};
use notes_backend_server::config::ServerConfig;
use serde_json::{json, Value};
use support::{body_json, empty_request, json_request, test_app, test_app_with_config};
use tower::ServiceExt;

async fn create_note(app: &Router, title: &str, content: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/notes",
            &json!({"title": title, "content": content}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_create_note_returns_server_derived_fields() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/notes")
                .header(header::CONTENT_TYPE, "application/json")
                .header("X-User-Id", "alice")
                .body(Body::from(
                    json!({"title": "Test", "content": "Hello"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Test");
    assert_eq!(body["content"], "Hello");
    assert_eq!(body["createdBy"], "alice");
    assert_eq!(body["updatedBy"], "alice");
    assert!(body["id"].as_str().is_some());
    assert!(body["createdAt"].as_str().is_some());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn test_create_note_defaults_user_to_system() {
    let (app, _pool) = test_app().await;
    let body = create_note(&app, "Test", "").await;
    assert_eq!(body["createdBy"], "system");
}

#[tokio::test]
async fn test_create_note_content_is_optional() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/notes",
            &json!({"title": "Test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["content"], "");
}

#[tokio::test]
async fn test_create_blank_title_returns_validation_envelope() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/notes",
            &json!({"title": "   ", "content": "c"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Validation error");
    assert_eq!(body["path"], "/api/v1/notes");
    assert!(body["timestamp"].as_str().is_some());
    assert!(body["details"].as_str().unwrap().contains("title"));

    // 失敗したミューテーションは何も残さない
    let list = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes"))
        .await
        .unwrap();
    let body = body_json(list).await;
    assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn test_create_missing_title_field_is_rejected() {
    let (app, _pool) = test_app().await;

    // extractor拒否でもエンベロープが合成される
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/notes", &json!({"content": "c"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
    assert_eq!(body["path"], "/api/v1/notes");
}

#[tokio::test]
async fn test_get_note_round_trip() {
    let (app, _pool) = test_app().await;
    let created = create_note(&app, "Test", "Content").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/notes/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_unknown_note_returns_not_found_envelope() {
    let (app, _pool) = test_app().await;

    let uri = "/api/v1/notes/00000000-0000-0000-0000-000000000000";
    let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "NOT_FOUND");
    assert_eq!(body["message"], "Not found");
    assert_eq!(body["path"], uri);
}

#[tokio::test]
async fn test_get_note_with_malformed_id_is_client_error() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_notes_defaults_and_total_count() {
    let (app, _pool) = test_app().await;
    for i in 0..3 {
        create_note(&app, &format!("Note {}", i), "").await;
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["page"], 0);
    assert_eq!(body["size"], 20);
    assert_eq!(body["notes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_notes_title_filter_is_case_insensitive() {
    let (app, _pool) = test_app().await;
    create_note(&app, "Meeting Agenda", "").await;
    create_note(&app, "Shopping List", "").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes?title=MEETING"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["notes"][0]["title"], "Meeting Agenda");
}

#[tokio::test]
async fn test_list_notes_pagination_and_sort() {
    let (app, _pool) = test_app().await;
    for title in ["Charlie", "Alpha", "Bravo"] {
        create_note(&app, title, "").await;
    }

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/notes?sort=title&page=0&size=2",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["size"], 2);
    let titles: Vec<&str> = body["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alpha", "Bravo"]);

    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/notes?sort=title&page=1&size=2",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["notes"][0]["title"], "Charlie");
}

#[tokio::test]
async fn test_list_notes_rejects_invalid_paging_and_sort() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes?page=-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errorCode"], "VALIDATION_ERROR");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes?size=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/notes?sort=secrets,desc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errorCode"], "VALIDATION_ERROR");

    // オフセット計算が溢れる極端なページ番号も拒否される
    let response = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/notes?page=9223372036854775807&size=2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errorCode"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_notes_oversized_filter_is_constraint_violation() {
    let (app, _pool) = test_app().await;

    let uri = format!("/api/v1/notes?title={}", "x".repeat(201));
    let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "CONSTRAINT_VIOLATION");
    assert_eq!(body["message"], "Constraint violation");
}

#[tokio::test]
async fn test_update_note_applies_only_title_and_content() {
    let (app, _pool) = test_app().await;
    let created = create_note(&app, "Test", "Content").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/notes/{}", id))
                .header(header::CONTENT_TYPE, "application/json")
                .header("X-User-Id", "editor")
                .body(Body::from(
                    json!({"title": "Updated", "content": "New"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["title"], "Updated");
    assert_eq!(body["content"], "New");
    assert_eq!(body["createdBy"], created["createdBy"]);
    assert_eq!(body["createdAt"], created["createdAt"]);
    assert_eq!(body["updatedBy"], "editor");
}

#[tokio::test]
async fn test_update_unknown_note_returns_not_found() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/notes/00000000-0000-0000-0000-000000000000",
            &json!({"title": "T", "content": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_requires_admin_role() {
    let (app, _pool) = test_app().await;
    let created = create_note(&app, "Test", "").await;
    let id = created["id"].as_str().unwrap();

    // ロールヘッダーなし（USER扱い）は拒否される
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/notes/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "FORBIDDEN");

    // ノートは残っている
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/notes/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_forbidden_even_for_unknown_note() {
    let (app, _pool) = test_app().await;

    // ロール検査は存在チェックより先（404ではなく403）
    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            "/api/v1/notes/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_as_admin_removes_note() {
    let (app, _pool) = test_app().await;
    let created = create_note(&app, "Test", "").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/notes/{}", id))
                .header("X-Role", "ADMIN")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/v1/notes/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_signature_flag_enforced() {
    let config = ServerConfig {
        require_signature_on_delete: true,
        ..ServerConfig::default()
    };
    let (app, _pool) = test_app_with_config(config).await;
    let created = create_note(&app, "Test", "").await;
    let id = created["id"].as_str().unwrap();

    // 署名ヘッダーなしは拒否
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/notes/{}", id))
                .header("X-Role", "ADMIN")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "VALIDATION_ERROR");

    // 非空白の署名トークンがあれば成功
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/notes/{}", id))
                .header("X-Role", "ADMIN")
                .header("X-Signature", "sig-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/unknown"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "NOT_FOUND");
    assert_eq!(body["path"], "/api/v1/unknown");
}

#[tokio::test]
async fn test_role_header_is_case_insensitive() {
    let (app, _pool) = test_app().await;
    let created = create_note(&app, "Test", "").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/notes/{}", id))
                .header("X-Role", "admin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
