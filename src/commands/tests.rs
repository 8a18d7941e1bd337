use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

use super::{create_router, AppState};
use crate::config::AppConfig;
use crate::models::DEFAULT_SCRIPT;
use crate::services::pipeline::{EMPTY_SCRIPT_WARNING, MISSING_IMAGE_WARNING};
use crate::services::testing::{fake_wav2lip, list_names, FakeTts, WRITES_OUTPUT};
use crate::services::TalkingHeadGenerator;

async fn spawn_app(config: AppConfig, tts: &FakeTts) -> String {
    let generator = TalkingHeadGenerator::new(&config, Arc::new(tts.clone()));
    let router = create_router(Arc::new(AppState::new(config, generator)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn image_part() -> Part {
    Part::bytes(b"png bytes".to_vec())
        .file_name("anchor.png")
        .mime_str("image/png")
        .unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, true);
    let base = spawn_app(config, &FakeTts::default()).await;

    let body = reqwest::get(&base).await.unwrap().text().await.unwrap();
    assert!(body.contains("Generate Video"));
    assert!(body.contains(DEFAULT_SCRIPT));
    assert!(body.contains("Upload a front-facing image of the anchor"));
}

#[tokio::test]
async fn test_empty_script_warning() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, true);
    let tts = FakeTts::default();
    let base = spawn_app(config, &tts).await;

    let form = Form::new().text("script", "  ").part("image", image_part());
    let res = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "warning");
    assert_eq!(body["message"], EMPTY_SCRIPT_WARNING);
    assert_eq!(tts.call_count(), 0);
}

#[tokio::test]
async fn test_empty_upload_is_missing_image() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, true);
    let tts = FakeTts::default();
    let base = spawn_app(config, &tts).await;

    // Браузер отправляет пустую часть, если файл не выбран
    let empty = Part::bytes(Vec::new()).file_name("");
    let form = Form::new().text("script", "Hello").part("image", empty);
    let res = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], MISSING_IMAGE_WARNING);
    assert_eq!(tts.call_count(), 0);
}

#[tokio::test]
async fn test_missing_checkpoint_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, false);
    let tts = FakeTts::default();
    let base = spawn_app(config, &tts).await;

    let form = Form::new().text("script", "Hello").part("image", image_part());
    let res = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(tts.call_count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_generate_and_fetch_video() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, true);
    let work_dir = config.work_dir.clone();
    let base = spawn_app(config, &FakeTts::default()).await;
    let client = reqwest::Client::new();

    let form = Form::new()
        .text("script", "Hello")
        .text("language", "en")
        .text("slow", "on")
        .part("image", image_part());
    let res = client
        .post(format!("{}/api/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    let video_url = body["video_url"].as_str().unwrap().to_string();

    let names = list_names(&work_dir);
    assert_eq!(names.len(), 1);
    assert_eq!(video_url, format!("/videos/{}", names[0]));

    let video = client
        .get(format!("{}{}", base, video_url))
        .send()
        .await
        .unwrap();
    assert_eq!(video.status(), StatusCode::OK);
    assert_eq!(video.headers()["content-type"], "video/mp4");
    assert_eq!(video.bytes().await.unwrap().as_ref(), b"fake mp4");
}

#[tokio::test]
async fn test_preview_audio() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, false);
    let base = spawn_app(config, &FakeTts::default()).await;

    let form = Form::new().text("script", "Hola").text("language", "es");
    let res = reqwest::Client::new()
        .post(format!("{}/api/preview", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "audio/mpeg");
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"es:Hola");
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, true);
    let base = spawn_app(config, &FakeTts::default()).await;

    for path in ["/videos/output_abcdef.mp4", "/videos/secret.txt"] {
        let res = reqwest::get(format!("{}{}", base, path)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_health_and_languages() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_wav2lip(dir.path(), WRITES_OUTPUT, true);
    let base = spawn_app(config, &FakeTts::default()).await;

    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["tts_engine"], "fake");
    assert_eq!(health["checkpoint_present"], true);

    let languages: Value = reqwest::get(format!("{}/api/languages", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(languages["default"], "en");
    assert!(languages["languages"].as_array().unwrap().len() > 1);
}
