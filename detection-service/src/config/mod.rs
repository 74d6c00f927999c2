use crate::services::providers::gemini::GEMINI_API_BASE;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_env_any, get_env_parsed};
use service_core::error::AppError;

/// `GEMINI_API_KEY` is still accepted for older deployments.
const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Default upload limit (10MB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Images larger than this on either side are downscaled before detection.
const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub assets: AssetConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model used for object detection (e.g., gemini-2.0-flash)
    pub detection_model: String,
    /// Model used for texture generation, must support image output
    pub asset_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    /// Source textures, one `{model}_{asset_type}.jpg` per pair
    pub origin_dir: String,
    /// Generated textures, `{model}_{asset_type}_{timestamp}.jpg`
    pub created_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_upload_bytes: usize,
    pub max_image_dimension: u32,
}

impl DetectionConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = core_config::is_production();

        Ok(DetectionConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: get_env_any(&API_KEY_VARS, None, is_prod)?,
                api_base_url: get_env("GEMINI_API_BASE_URL", Some(GEMINI_API_BASE), is_prod)?,
            },
            models: ModelConfig {
                detection_model: get_env(
                    "GEMINI_DETECTION_MODEL",
                    Some("gemini-2.0-flash"),
                    is_prod,
                )?,
                asset_model: get_env(
                    "GEMINI_ASSET_MODEL",
                    Some("gemini-2.0-flash-exp-image-generation"),
                    is_prod,
                )?,
            },
            assets: AssetConfig {
                origin_dir: get_env("ASSET_ORIGIN_DIR", Some("assets/origin"), is_prod)?,
                created_dir: get_env("ASSET_CREATED_DIR", Some("assets/created"), is_prod)?,
            },
            upload: UploadConfig {
                max_upload_bytes: get_env_parsed(
                    "MAX_UPLOAD_BYTES",
                    DEFAULT_MAX_UPLOAD_BYTES,
                    is_prod,
                )?,
                max_image_dimension: get_env_parsed(
                    "MAX_IMAGE_DIMENSION",
                    DEFAULT_MAX_IMAGE_DIMENSION,
                    is_prod,
                )?,
            },
        })
    }
}
