use crate::models::{AssetQuery, AssetResponse};
use crate::services::asset_store::AssetStore;
use crate::services::imaging;
use crate::services::providers::{GenerationParams, ImageInput, Modality, VisionProvider};
use std::sync::Arc;

pub const TEXTURE_PROMPT: &str = "This is a texture for a 3D model. \
    Please generate cute variations of this texture. \
    Do not change the shape or structure of the texture. \
    Only modify the center red section, while keeping the rest of the texture the same.";

/// Generates new texture variants from the stored origin textures.
#[derive(Clone)]
pub struct AssetGenerator {
    provider: Arc<dyn VisionProvider>,
    store: Arc<AssetStore>,
}

impl AssetGenerator {
    pub fn new(provider: Arc<dyn VisionProvider>, store: Arc<AssetStore>) -> Self {
        Self { provider, store }
    }

    /// Generate and store a variant of the origin texture for `asset`.
    ///
    /// Any failure along the way yields an unsuccessful response.
    pub async fn create(&self, asset: &AssetQuery) -> AssetResponse {
        let origin = match self.store.origin_image(asset).await {
            Ok(origin) => origin,
            Err(e) => {
                tracing::warn!(asset = %asset.file_prefix(), error = %e, "Origin texture unavailable");
                return AssetResponse::failure();
            }
        };

        let mime_type = imaging::detect_format(&origin)
            .map(imaging::mime_type)
            .unwrap_or("image/jpeg");
        let image = ImageInput {
            mime_type: mime_type.to_string(),
            data: origin,
        };
        let params = GenerationParams {
            response_modalities: vec![Modality::Text, Modality::Image],
            ..Default::default()
        };

        let response = match self.provider.generate(TEXTURE_PROMPT, &image, &params).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(model = %self.provider.model(), error = %e, "Asset generation request failed");
                return AssetResponse::failure();
            }
        };

        let Some(generated) = response.image.filter(|data| !data.is_empty()) else {
            tracing::info!(asset = %asset.file_prefix(), "Model returned no image");
            return AssetResponse::failure();
        };

        match self.store.save_created(asset, &generated).await {
            Ok(file) => AssetResponse::found(file),
            Err(e) => {
                tracing::error!(error = %e, "Failed to store generated asset");
                AssetResponse::failure()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetType, PlasticType};
    use crate::services::providers::mock::{MockReply, MockVisionProvider};
    use rand::{rngs::StdRng, SeedableRng};

    fn generator(dir: &std::path::Path, reply: MockReply) -> (AssetGenerator, Arc<MockVisionProvider>) {
        let provider = Arc::new(MockVisionProvider::new(reply));
        let store = Arc::new(AssetStore::with_rng(
            dir.join("origin"),
            dir.join("created"),
            StdRng::seed_from_u64(1),
        ));
        (AssetGenerator::new(provider.clone(), store), provider)
    }

    fn cup_texture() -> AssetQuery {
        AssetQuery {
            model: PlasticType::Cup,
            asset_type: AssetType::Texture,
        }
    }

    fn write_origin(dir: &std::path::Path) {
        std::fs::create_dir_all(dir.join("origin")).unwrap();
        std::fs::write(dir.join("origin").join("cup_texture.jpg"), b"origin").unwrap();
    }

    #[tokio::test]
    async fn missing_origin_fails_without_calling_provider() {
        let dir = tempfile::tempdir().unwrap();
        let (generator, provider) = generator(dir.path(), MockReply::Image(vec![1, 2, 3]));

        let response = generator.create(&cup_texture()).await;
        assert_eq!(response, AssetResponse::failure());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn generated_image_is_stored_and_returned() {
        let dir = tempfile::tempdir().unwrap();
        write_origin(dir.path());
        let (generator, provider) = generator(dir.path(), MockReply::Image(vec![9, 9, 9, 9]));

        let response = generator.create(&cup_texture()).await;
        assert!(response.success);
        let file = response.file.unwrap();
        assert!(file.filename.starts_with("cup_texture_"));
        assert_eq!(file.size, 4);
        assert_eq!(provider.last_prompt().as_deref(), Some(TEXTURE_PROMPT));

        let stored = std::fs::read(dir.path().join("created").join(&file.filename)).unwrap();
        assert_eq!(stored, vec![9, 9, 9, 9]);
    }

    #[tokio::test]
    async fn text_only_reply_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_origin(dir.path());
        let (generator, _) = generator(dir.path(), MockReply::Text("no image today".to_string()));

        assert_eq!(generator.create(&cup_texture()).await, AssetResponse::failure());
        assert!(!dir.path().join("created").exists());
    }

    #[tokio::test]
    async fn provider_error_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_origin(dir.path());
        let (generator, _) = generator(dir.path(), MockReply::Fail("boom".to_string()));

        assert_eq!(generator.create(&cup_texture()).await, AssetResponse::failure());
    }
}
