use axum::{
    Json, Router,
    extract::Multipart,
    http::StatusCode,
    routing::post,
};
use rainyield_core::{HistoricalRow, Provider};
use rainyield_tui::{ApiClient, App, Outcome};
use serde_json::{Value, json};

async fn fake_predict(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["provider"] == "deepseek" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "DEEPSEEK_API_KEY environment variable not set"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "prediction": "3.25",
            "comment": "Adequate rainfall.",
            "provider": body["provider"],
            "rainfall": body["rainfall"],
            "timestamp": "2026-03-01T12:00:00Z"
        })),
    )
}

async fn fake_upload(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            let text = field.text().await.unwrap();
            if !text.starts_with("rainfall") {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "message": "CSV must have a header row"})),
                );
            }
            return (
                StatusCode::OK,
                Json(json!({"success": true, "data": [
                    {"rainfall": 800.0, "yield": 2.1},
                    {"rainfall": 1500.0, "yield": null}
                ]})),
            );
        }
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "message": "No file uploaded"})),
    )
}

async fn spawn_fake_server() -> String {
    let app = Router::new()
        .route("/api/predict", post(fake_predict))
        .route("/api/upload", post(fake_upload));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_predict_round_trip_into_history() {
    let client = ApiClient::new(spawn_fake_server().await);
    let response = client.predict(912.5, Provider::Llama).await.unwrap();
    assert_eq!(*response.rainfall(), 912.5);
    assert_eq!(*response.provider(), Provider::Llama);

    let mut app = App::new();
    app.apply(Outcome::Predicted(Ok(response)));
    let latest = app.latest.unwrap();
    assert_eq!(*latest.yield_tons(), 3.25);
    assert_eq!(latest.comment().as_deref(), Some("Adequate rainfall."));
}

#[tokio::test]
async fn test_server_error_message_surfaces() {
    let client = ApiClient::new(spawn_fake_server().await);
    let err = client.predict(500.0, Provider::Deepseek).await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "DEEPSEEK_API_KEY environment variable not set"
    );
}

#[tokio::test]
async fn test_upload_bytes() {
    let client = ApiClient::new(spawn_fake_server().await);
    let rows = client
        .upload_bytes("rain.csv".into(), b"rainfall,yield\n800,2.1\n1500,x\n".to_vec())
        .await
        .unwrap();
    assert_eq!(rows[0], HistoricalRow::new(800.0, 2.1));
    assert!(rows[1].yield_tons.is_nan());

    let err = client
        .upload_bytes("rain.csv".into(), b"800,2.1\n".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "CSV must have a header row");
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let client = ApiClient::new(spawn_fake_server().await);
    let err = client
        .upload_csv(std::path::Path::new("/nonexistent/rainyield.csv"))
        .await
        .unwrap_err();
    assert!(err.user_message().starts_with("Cannot read"));
}
