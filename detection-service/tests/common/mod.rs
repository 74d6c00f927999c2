#![allow(dead_code)]

use detection_service::config::{
    AssetConfig, DetectionConfig, GoogleConfig, ModelConfig, UploadConfig,
};
use detection_service::services::providers::gemini::GEMINI_API_BASE;
use detection_service::services::providers::mock::{MockReply, MockVisionProvider};
use detection_service::startup::{Application, Providers};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use service_core::config::Config as CoreConfig;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub detection_provider: Arc<MockVisionProvider>,
    pub asset_provider: Arc<MockVisionProvider>,
    pub origin_dir: PathBuf,
    pub created_dir: PathBuf,
    pub client: reqwest::Client,
    _assets: TempDir,
}

pub fn test_config(assets: &TempDir) -> DetectionConfig {
    DetectionConfig {
        common: CoreConfig { port: 0 },
        google: GoogleConfig {
            api_key: "test-api-key".to_string(),
            api_base_url: GEMINI_API_BASE.to_string(),
        },
        models: ModelConfig {
            detection_model: "gemini-2.0-flash".to_string(),
            asset_model: "gemini-2.0-flash-exp-image-generation".to_string(),
        },
        assets: AssetConfig {
            origin_dir: assets.path().join("origin").to_string_lossy().into_owned(),
            created_dir: assets.path().join("created").to_string_lossy().into_owned(),
        },
        upload: UploadConfig {
            max_upload_bytes: 1024 * 1024,
            max_image_dimension: 1024,
        },
    }
}

impl TestApp {
    pub async fn spawn(detection_reply: MockReply, asset_reply: MockReply) -> Self {
        let assets = tempfile::tempdir().expect("Failed to create asset directory");
        let config = test_config(&assets);
        let origin_dir = PathBuf::from(&config.assets.origin_dir);
        let created_dir = PathBuf::from(&config.assets.created_dir);

        let detection_provider = Arc::new(MockVisionProvider::new(detection_reply));
        let asset_provider = Arc::new(MockVisionProvider::new(asset_reply));
        let providers = Providers {
            detection: detection_provider.clone(),
            asset: asset_provider.clone(),
        };

        let app = Application::build_with_providers(config, providers)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            detection_provider,
            asset_provider,
            origin_dir,
            created_dir,
            client,
            _assets: assets,
        }
    }

    pub async fn post_image(&self, file_name: &str, mime: &str, data: Vec<u8>) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Invalid mime type");
        let form = reqwest::multipart::Form::new().part("image", part);

        self.client
            .post(format!("{}/detect", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub fn write_origin(&self, name: &str, data: &[u8]) {
        std::fs::create_dir_all(&self.origin_dir).unwrap();
        std::fs::write(self.origin_dir.join(name), data).unwrap();
    }

    pub fn write_created(&self, name: &str, data: &[u8]) {
        std::fs::create_dir_all(&self.created_dir).unwrap();
        std::fs::write(self.created_dir.join(name), data).unwrap();
    }
}

pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([220, 20, 20])));
    let mut output = Cursor::new(Vec::new());
    img.write_to(&mut output, format).expect("Failed to encode image");
    output.into_inner()
}
