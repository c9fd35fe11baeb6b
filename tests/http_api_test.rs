use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use schedule_view::api::{HttpScheduleApi, ScheduleApi};
use schedule_view::config::ApiConfig;
use schedule_view::models::{NewScheduleRequest, UpdateScheduleRequest};
use schedule_view::view::EngineOptions;
use schedule_view::{AppError, FetchOutcome, ScheduleViewEngine};
use serde_json::{Value, json};

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test backend stopped");
    });
    format!("http://{}", addr)
}

fn sample(id: &str) -> Value {
    json!({
        "id": id,
        "classId": 2,
        "roomId": 5,
        "class": { "name": "Physics", "code": "PHY1" },
        "room": { "code": "Lab 2", "building": "Science", "capacity": 24 },
        "dayOfWeek": "Thursday",
        "startTime": "13:00:00",
        "endTime": "14:15:00",
        "isRecurring": true,
        "isActive": true
    })
}

fn client(base_url: &str) -> HttpScheduleApi {
    HttpScheduleApi::new(ApiConfig::new(base_url)).expect("Failed to build client")
}

#[tokio::test]
async fn test_bulk_fetch_accepts_all_wrapper_shapes() {
    let app = Router::new()
        .route("/bare/schedules", get(|| async { Json(json!([sample("1"), sample("2")])) }))
        .route(
            "/flagged/schedules",
            get(|| async { Json(json!({ "success": true, "data": [sample("1")] })) }),
        )
        .route(
            "/data/schedules",
            get(|| async { Json(json!({ "data": [sample("1"), sample("2"), sample("3")] })) }),
        );
    let base = spawn_backend(app).await;

    let bare = client(&format!("{}/bare", base)).fetch_schedules().await.unwrap();
    let flagged = client(&format!("{}/flagged", base)).fetch_schedules().await.unwrap();
    let data = client(&format!("{}/data", base)).fetch_schedules().await.unwrap();

    assert_eq!(bare.len(), 2);
    assert_eq!(flagged.len(), 1);
    assert_eq!(data.len(), 3);
}

#[tokio::test]
async fn test_fetch_by_id_shapes_and_not_found() {
    let app = Router::new().route(
        "/schedules/{id}",
        get(|Path(id): Path<String>| async move {
            match id.as_str() {
                "array" => (StatusCode::OK, Json(json!({ "data": [sample("array"), sample("other")] }))),
                "object" => (StatusCode::OK, Json(json!({ "success": true, "data": sample("object") }))),
                "empty" => (StatusCode::OK, Json(json!([]))),
                "bare" => (StatusCode::OK, Json(sample("bare"))),
                _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Schedule not found" }))),
            }
        }),
    );
    let base = spawn_backend(app).await;
    let api = client(&base);

    let first = api.fetch_schedule("array").await.unwrap().unwrap();
    assert_eq!(first["id"], "array");
    let object = api.fetch_schedule("object").await.unwrap().unwrap();
    assert_eq!(object["id"], "object");
    let bare = api.fetch_schedule("bare").await.unwrap().unwrap();
    assert_eq!(bare["id"], "bare");
    assert!(api.fetch_schedule("empty").await.unwrap().is_none());
    assert!(api.fetch_schedule("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let app = Router::new().route(
        "/schedules",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "message": "Maintenance window" })),
            )
        }),
    );
    let base = spawn_backend(app).await;

    let err = client(&base).fetch_schedules().await.unwrap_err();
    match &err {
        AppError::Api { status, message } => {
            assert_eq!(*status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(message.as_deref(), Some("Maintenance window"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.user_message("Failed to load schedules"), "Maintenance window");
}

#[tokio::test]
async fn test_success_false_body_is_an_error() {
    let app = Router::new().route(
        "/schedules",
        get(|| async { Json(json!({ "success": false, "message": "Session expired" })) }),
    );
    let base = spawn_backend(app).await;

    let err = client(&base).fetch_schedules().await.unwrap_err();
    assert_eq!(err.user_message("fallback"), "Session expired");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let app = Router::new().route("/schedules", get(|| async { "<html>oops</html>" }));
    let base = spawn_backend(app).await;

    let err = client(&base).fetch_schedules().await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
    assert_eq!(err.user_message("Failed to load schedules"), "Failed to load schedules");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let app = Router::new().route(
        "/schedules",
        get(|headers: HeaderMap| async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer secret-token");
            if authorized {
                (StatusCode::OK, Json(json!([sample("1")])))
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })))
            }
        }),
    );
    let base = spawn_backend(app).await;

    let anonymous = client(&base).fetch_schedules().await.unwrap_err();
    assert_eq!(anonymous.user_message("fallback"), "Unauthorized");

    let api = HttpScheduleApi::new(ApiConfig::new(&base).with_token("secret-token")).unwrap();
    assert_eq!(api.fetch_schedules().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mutation_status_handling() {
    let app = Router::new()
        .route(
            "/schedules",
            get(|| async { Json(json!([])) }).post(|| async { (StatusCode::CREATED, Json(json!({ "id": "9" }))) }),
        )
        .route(
            "/schedules/{id}",
            get(|| async { Json(json!([])) })
                .put(|Path(id): Path<String>| async move {
                    if id == "locked" {
                        (StatusCode::OK, Json(json!({ "success": false, "message": "Schedule is locked" })))
                    } else {
                        (StatusCode::ACCEPTED, Json(json!({ "success": true })))
                    }
                })
                .delete(|Path(id): Path<String>| async move {
                    if id == "gone" {
                        StatusCode::GONE
                    } else {
                        StatusCode::NO_CONTENT
                    }
                }),
        );
    let base = spawn_backend(app).await;
    let api = client(&base);

    let req = NewScheduleRequest {
        class_id: 1,
        room_id: 1,
        day_of_week: "Monday".to_string(),
        start_time: "08:00".to_string(),
        end_time: "09:00".to_string(),
        is_recurring: true,
        is_active: true,
    };
    api.create_schedule(&req).await.unwrap();

    api.update_schedule("7", &UpdateScheduleRequest::default()).await.unwrap();
    let locked = api
        .update_schedule("locked", &UpdateScheduleRequest::default())
        .await
        .unwrap_err();
    assert_eq!(locked.user_message("fallback"), "Schedule is locked");

    api.delete_schedule("7").await.unwrap();
    assert!(api.delete_schedule("gone").await.is_err());
}

#[tokio::test]
async fn test_engine_over_http_refetches_after_delete() {
    let store = Arc::new(Mutex::new(vec![sample("a"), sample("b"), sample("c")]));

    let app = Router::new()
        .route(
            "/schedules",
            get(|State(store): State<Arc<Mutex<Vec<Value>>>>| async move {
                let data = store.lock().unwrap().clone();
                Json(json!({ "success": true, "data": data }))
            }),
        )
        .route(
            "/schedules/{id}",
            get(|| async { Json(json!([])) }).delete(
                |State(store): State<Arc<Mutex<Vec<Value>>>>, Path(id): Path<String>| async move {
                    store.lock().unwrap().retain(|r| r["id"] != json!(id));
                    Json(json!({ "success": true }))
                },
            ),
        )
        .with_state(store.clone());
    let base = spawn_backend(app).await;

    let config = ApiConfig::new(&base);
    let engine = ScheduleViewEngine::new(
        Arc::new(client(&base)),
        Arc::new(schedule_view::notify::TracingNotifier),
        EngineOptions::from(&config),
    );

    assert_eq!(engine.fetch_all().await, FetchOutcome::Applied(3));
    let first = &engine.schedules()[0];
    assert_eq!(first.duration_minutes, 75);
    assert_eq!(first.building, "Science");

    engine.delete("b").await.unwrap();

    assert_eq!(engine.loaded_count(), 2);
    assert_eq!(engine.meta().total, 2);
    assert_eq!(store.lock().unwrap().len(), 2);
}
