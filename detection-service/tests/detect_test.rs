mod common;

use common::{encode_image, TestApp};
use detection_service::services::providers::mock::MockReply;
use image::ImageFormat;
use serde_json::Value;

const TWO_OBJECTS: &str = r#"Detected objects:
[
  {"label": "bottle", "confidence": 0.93, "status": "dirty", "how_to_recycle": "Rinse and remove the cap.", "box_2d": [120, 80, 640, 300]},
  {"label": "cup", "confidence": 0.41, "status": "clean"},
  {"label": "container", "confidence": 0.77, "status": "clean"}
]"#;

#[tokio::test]
async fn detect_returns_objects_above_threshold() {
    let app = TestApp::spawn(MockReply::Text(TWO_OBJECTS.to_string()), MockReply::Empty).await;

    let response = app
        .post_image("photo.jpg", "image/jpeg", encode_image(32, 32, ImageFormat::Jpeg))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["total_objects"], 2);
    assert_eq!(body["objects"].as_array().unwrap().len(), 2);
    assert_eq!(body["objects"][0]["label"], "bottle");
    assert_eq!(body["objects"][0]["status"], "dirty");
    assert_eq!(body["objects"][0]["box_2d"][3], 300.0);
    assert_eq!(body["objects"][1]["label"], "container");
    assert!(body["objects"][1]["how_to_recycle"].is_null());
    assert_eq!(app.detection_provider.calls(), 1);
}

#[tokio::test]
async fn detect_accepts_png_and_bmp() {
    let app = TestApp::spawn(MockReply::Text(TWO_OBJECTS.to_string()), MockReply::Empty).await;

    for (name, mime, format) in [
        ("photo.png", "image/png", ImageFormat::Png),
        ("photo.bmp", "image/bmp", ImageFormat::Bmp),
    ] {
        let response = app.post_image(name, mime, encode_image(16, 16, format)).await;
        assert_eq!(response.status(), 200, "{} should be accepted", name);
    }
}

#[tokio::test]
async fn non_image_upload_is_unprocessable() {
    let app = TestApp::spawn(MockReply::Text(TWO_OBJECTS.to_string()), MockReply::Empty).await;

    let response = app
        .post_image("notes.txt", "text/plain", b"just some text".to_vec())
        .await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error_code"], 422);
    assert_eq!(body["error_message"], "Unprocessable Entity");
    assert_eq!(body["detail"], "Invalid image format");
    assert_eq!(app.detection_provider.calls(), 0);
}

#[tokio::test]
async fn truncated_image_is_unprocessable() {
    let app = TestApp::spawn(MockReply::Text(TWO_OBJECTS.to_string()), MockReply::Empty).await;

    let png = encode_image(64, 64, ImageFormat::Png);
    let response = app
        .post_image("broken.png", "image/png", png[..png.len() / 2].to_vec())
        .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn missing_image_field_is_unprocessable() {
    let app = TestApp::spawn(MockReply::Empty, MockReply::Empty).await;

    let form = reqwest::multipart::Form::new().text("comment", "no file here");
    let response = app
        .client
        .post(format!("{}/detect", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["detail"], "No image provided");
    assert_eq!(body["error_code"], 422);
}

#[tokio::test]
async fn non_multipart_request_is_unprocessable() {
    let app = TestApp::spawn(MockReply::Empty, MockReply::Empty).await;

    let response = app
        .client
        .post(format!("{}/detect", app.address))
        .json(&serde_json::json!({ "image": "nope" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn no_detections_is_unsuccessful_with_ok_status() {
    let app = TestApp::spawn(MockReply::Text("[]".to_string()), MockReply::Empty).await;

    let response = app
        .post_image("photo.jpg", "image/jpeg", encode_image(32, 32, ImageFormat::Jpeg))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!({ "success": false, "objects": [], "total_objects": 0 })
    );
}

#[tokio::test]
async fn provider_failure_is_unsuccessful_with_ok_status() {
    let app = TestApp::spawn(MockReply::Fail("upstream down".to_string()), MockReply::Empty).await;

    let response = app
        .post_image("photo.jpg", "image/jpeg", encode_image(32, 32, ImageFormat::Jpeg))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["total_objects"], 0);
    assert_eq!(app.detection_provider.calls(), 1);
}
