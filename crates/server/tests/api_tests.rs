//! Integration tests for HTTP API endpoints.

mod common;

use axum::http::StatusCode;
use common::TestServer;
use dilmer_server::ApiConfig;
use serde_json::{Value, json};

async fn signup(server: &TestServer, name: &str, password: &str) -> u64 {
    let (status, body) = server
        .post("/api/signup", json!({ "name": name, "password": password }))
        .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    assert_eq!(body["success"], json!(true));
    body["id"].as_u64().expect("numeric id")
}

async fn submit(server: &TestServer, body: Value) {
    let (status, response) = server.post("/api/grades", body).await;
    assert_eq!(status, StatusCode::OK, "submit failed: {response}");
    assert_eq!(response, json!({ "success": true }));
}

#[tokio::test]
async fn test_signup_twice_with_different_case_is_rejected() {
    let server = TestServer::new();
    signup(&server, "Ali Veli", "1234").await;

    let (status, body) = server
        .post("/api/signup", json!({ "name": "ali veli", "password": "other" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Bu isimde bir hesap zaten var." }));
}

#[tokio::test]
async fn test_login_is_case_insensitive() {
    let server = TestServer::new();
    let id = signup(&server, "Ali Veli", "1234").await;

    let (status, body) = server
        .post("/api/login", json!({ "name": "ALI VELI", "password": "1234" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "studentId": id, "name": "ali veli" })
    );
}

#[tokio::test]
async fn test_wrong_password_matches_unknown_name() {
    let server = TestServer::new();
    signup(&server, "Berk", "right").await;

    let wrong_password = server
        .post("/api/login", json!({ "name": "Berk", "password": "wrong" }))
        .await;
    let unknown_name = server
        .post("/api/login", json!({ "name": "Nobody", "password": "right" }))
        .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_name);
    assert_eq!(
        wrong_password.1,
        json!({ "error": "Hatalı Ad Soyad veya Şifre." })
    );
}

#[tokio::test]
async fn test_resubmitted_grade_replaces_previous() {
    let server = TestServer::new();
    let id = signup(&server, "Ali", "pw").await;

    submit(
        &server,
        json!({ "studentId": id, "chapter": 3, "correct": 8, "wrong": 2, "wrongQuestions": [1, 5] }),
    )
    .await;
    submit(
        &server,
        json!({ "studentId": id, "chapter": 3, "correct": 9, "wrong": 1 }),
    )
    .await;

    let (status, body) = server.get(&format!("/api/grades/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "chapter": 3, "correct": 9, "wrong": 1 }]));

    let (_, sheet) = server.get("/api/teacher/all-grades").await;
    assert_eq!(sheet[0]["yanlis_sorular"], Value::Null);
}

#[tokio::test]
async fn test_student_without_grades_gets_empty_list() {
    let server = TestServer::new();
    let id = signup(&server, "Ali", "pw").await;

    let (status, body) = server.get(&format!("/api/grades/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = server.get("/api/grades/9999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_student_grades_are_ordered_by_chapter() {
    let server = TestServer::new();
    let id = signup(&server, "Ali", "pw").await;
    for chapter in [4, 2, 3] {
        submit(
            &server,
            json!({ "studentId": id, "chapter": chapter, "correct": chapter, "wrong": 0 }),
        )
        .await;
    }

    let (_, body) = server.get(&format!("/api/grades/{id}")).await;
    let chapters: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["chapter"].as_i64().unwrap())
        .collect();
    assert_eq!(chapters, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_teacher_view_orders_by_name() {
    let server = TestServer::new();
    let berk = signup(&server, "Berk", "pw").await;
    let ayse = signup(&server, "Ayşe", "pw").await;

    submit(
        &server,
        json!({ "studentId": berk, "chapter": 1, "correct": 5, "wrong": 5 }),
    )
    .await;
    submit(
        &server,
        json!({ "studentId": ayse, "chapter": 1, "correct": 9, "wrong": 1, "wrongQuestions": "7" }),
    )
    .await;

    let (status, body) = server.get("/api/teacher/all-grades").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "ad_soyad": "ayşe", "bolum": 1, "dogru": 9, "yanlis": 1, "yanlis_sorular": "7" },
            { "ad_soyad": "berk", "bolum": 1, "dogru": 5, "yanlis": 5, "yanlis_sorular": null }
        ])
    );
}

#[tokio::test]
async fn test_string_student_id_is_accepted() {
    let server = TestServer::new();
    let id = signup(&server, "Ali", "pw").await;

    submit(
        &server,
        json!({ "studentId": id.to_string(), "chapter": 1, "correct": 3, "wrong": 7 }),
    )
    .await;

    let (_, body) = server.get(&format!("/api/grades/{id}")).await;
    assert_eq!(body, json!([{ "chapter": 1, "correct": 3, "wrong": 7 }]));
}

#[tokio::test]
async fn test_grade_for_unknown_student_fails_to_save() {
    let server = TestServer::new();
    let (status, body) = server
        .post(
            "/api/grades",
            json!({ "studentId": 42, "chapter": 1, "correct": 1, "wrong": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Not kaydedilemedi." }));
}

#[tokio::test]
async fn test_non_numeric_student_id_fails_like_store_error() {
    let server = TestServer::new();
    let (status, body) = server.get("/api/grades/abc").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Notlar getirilemedi." }));
}

#[tokio::test]
async fn test_negative_student_id_has_no_grades() {
    let server = TestServer::new();
    let id = signup(&server, "Ali", "pw").await;
    submit(
        &server,
        json!({ "studentId": id, "chapter": 1, "correct": 1, "wrong": 1 }),
    )
    .await;

    let (status, body) = server.get("/api/grades/-4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unreadable_grade_body_is_not_saved() {
    let server = TestServer::new();
    let id = signup(&server, "Ali", "pw").await;

    for body in [
        json!({ "chapter": 1 }),
        json!({ "studentId": -1, "chapter": 1, "correct": 1, "wrong": 1 }),
        json!({ "studentId": "abc", "chapter": 1, "correct": 1, "wrong": 1 }),
    ] {
        let (status, response) = server.post("/api/grades", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response, json!({ "error": "Not kaydedilemedi." }));
    }

    let (_, grades) = server.get(&format!("/api/grades/{id}")).await;
    assert_eq!(grades, json!([]));
}

#[tokio::test]
async fn test_store_failures_use_generic_messages() {
    let server = TestServer::broken("database is gone", ApiConfig::default());

    let (status, body) = server
        .post("/api/signup", json!({ "name": "Ali", "password": "pw" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Veritabanı hatası." }));

    let (status, body) = server
        .post("/api/login", json!({ "name": "Ali", "password": "pw" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Veritabanı hatası." }));

    let (status, body) = server.get("/api/grades/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Notlar getirilemedi." }));
}

#[tokio::test]
async fn test_teacher_view_echoes_raw_store_error() {
    let server = TestServer::broken("database is gone", ApiConfig::default());
    let (status, body) = server.get("/api/teacher/all-grades").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "connection error: database is gone" }));
}

#[tokio::test]
async fn test_teacher_view_redacts_when_configured() {
    let server = TestServer::broken(
        "database is gone",
        ApiConfig {
            redact_store_errors: true,
        },
    );
    let (status, body) = server.get("/api/teacher/all-grades").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Veritabanı hatası." }));
}

#[tokio::test]
async fn test_sqlite_backend_serves_full_flow() {
    let server = TestServer::sqlite().await;
    let ayse = signup(&server, "Ayşe", "pw").await;
    let berk = signup(&server, "Berk", "pw").await;

    let (status, _) = server
        .post("/api/signup", json!({ "name": "AYŞE", "password": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    submit(
        &server,
        json!({ "studentId": berk, "chapter": 2, "correct": 6, "wrong": 4 }),
    )
    .await;
    submit(
        &server,
        json!({ "studentId": ayse, "chapter": 2, "correct": 7, "wrong": 3, "wrongQuestions": [2, 9] }),
    )
    .await;

    let (_, body) = server.get("/api/teacher/all-grades").await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["ad_soyad"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ayşe", "berk"]);
    assert_eq!(body[0]["yanlis_sorular"], json!("[2,9]"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_submissions_leave_one_grade() {
    let server = TestServer::sqlite().await;
    let id = signup(&server, "Ali Veli", "pw").await;

    let mut handles = Vec::with_capacity(50);
    for i in 0..50 {
        let router = server.router.clone();
        handles.push(tokio::spawn(async move {
            common::json_request(
                &router,
                "POST",
                "/api/grades",
                Some(json!({ "studentId": id, "chapter": 3, "correct": i, "wrong": 1 })),
            )
            .await
        }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = server.get(&format!("/api/grades/{id}")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
