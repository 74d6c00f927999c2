use super::detection::PlasticType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of asset generated for a plastic category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Texture,
    Accessory,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Texture => "texture",
            AssetType::Accessory => "accessory",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters shared by the asset endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AssetQuery {
    pub model: PlasticType,
    #[serde(default)]
    pub asset_type: AssetType,
}

impl AssetQuery {
    /// File name prefix for assets of this pair, e.g. `cup_texture`.
    pub fn file_prefix(&self) -> String {
        format!("{}_{}", self.model, self.asset_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFile {
    pub filename: String,
    pub content_base64: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub success: bool,
    pub file: Option<AssetFile>,
}

impl AssetResponse {
    pub fn found(file: AssetFile) -> Self {
        Self {
            success: true,
            file: Some(file),
        }
    }

    /// Successful lookup that matched no stored asset.
    pub fn empty() -> Self {
        Self {
            success: true,
            file: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            file: None,
        }
    }
}
