//! Filesystem storage for origin textures and generated assets.

use crate::models::{AssetFile, AssetQuery};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use service_core::error::AppError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

const ASSET_EXTENSION: &str = ".jpg";

pub struct AssetStore {
    origin_dir: PathBuf,
    created_dir: PathBuf,
    rng: Mutex<StdRng>,
}

impl AssetStore {
    pub fn new(origin_dir: impl Into<PathBuf>, created_dir: impl Into<PathBuf>) -> Self {
        Self::with_rng(origin_dir, created_dir, StdRng::from_entropy())
    }

    /// Use a caller-provided random source for asset selection.
    pub fn with_rng(
        origin_dir: impl Into<PathBuf>,
        created_dir: impl Into<PathBuf>,
        rng: StdRng,
    ) -> Self {
        Self {
            origin_dir: origin_dir.into(),
            created_dir: created_dir.into(),
            rng: Mutex::new(rng),
        }
    }

    pub fn created_dir(&self) -> &Path {
        &self.created_dir
    }

    /// Read the source texture for `asset`, `{origin_dir}/{model}_{type}.jpg`.
    pub async fn origin_image(&self, asset: &AssetQuery) -> Result<Vec<u8>, AppError> {
        let path = self
            .origin_dir
            .join(format!("{}{}", asset.file_prefix(), ASSET_EXTENSION));

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                anyhow::anyhow!("No origin texture at {}", path.display()),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Pick a previously generated asset for `asset` at random.
    ///
    /// Returns `Ok(None)` when the directory does not exist or no file named
    /// `{model}_{type}*.jpg` is present.
    pub async fn pick_created(&self, asset: &AssetQuery) -> Result<Option<AssetFile>, AppError> {
        if !fs::try_exists(&self.created_dir).await.unwrap_or(false) {
            tracing::debug!(dir = %self.created_dir.display(), "Asset directory does not exist");
            return Ok(None);
        }

        let prefix = asset.file_prefix();
        let mut candidates = Vec::new();
        let mut entries = fs::read_dir(&self.created_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with(&prefix)
                && name.ends_with(ASSET_EXTENSION)
                && entry.file_type().await?.is_file()
            {
                candidates.push(name);
            }
        }

        // Directory order is platform dependent; sort so a seeded rng is reproducible.
        candidates.sort();

        let chosen = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| AppError::InternalError(anyhow::anyhow!("asset rng lock poisoned")))?;
            candidates.choose(&mut *rng).cloned()
        };

        let Some(name) = chosen else {
            tracing::debug!(prefix = %prefix, "No stored asset matches");
            return Ok(None);
        };

        tracing::debug!(file = %name, matches = candidates.len(), "Picked stored asset");
        read_asset_file(&self.created_dir.join(name)).await.map(Some)
    }

    /// Store a generated asset as `{model}_{type}_{timestamp}.jpg`.
    ///
    /// Existing files are never overwritten, and the final name only appears
    /// once its content is complete.
    pub async fn save_created(&self, asset: &AssetQuery, data: &[u8]) -> Result<AssetFile, AppError> {
        fs::create_dir_all(&self.created_dir).await?;

        let filename = format!(
            "{}_{}{}",
            asset.file_prefix(),
            chrono::Local::now().format("%Y%m%d%H%M%S%6f"),
            ASSET_EXTENSION
        );

        let dir = self.created_dir.clone();
        let name = filename.clone();
        let bytes = data.to_vec();
        tokio::task::spawn_blocking(move || write_new(&dir, &name, &bytes))
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("asset write task failed: {}", e)))??;

        tracing::info!(file = %filename, size = data.len(), "Stored generated asset");

        Ok(AssetFile {
            filename,
            content_base64: STANDARD.encode(data),
            size: data.len() as u64,
        })
    }
}

/// Write `data` to a hidden temp file in `dir`, then move it to `filename`
/// unless that name is taken. The temp file is removed on any failure.
fn write_new(dir: &Path, filename: &str, data: &[u8]) -> Result<(), AppError> {
    let mut staged = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged
        .persist_noclobber(dir.join(filename))
        .map_err(|e| AppError::from(e.error))?;
    Ok(())
}

/// Load a file from disk as an [`AssetFile`].
pub async fn read_asset_file(path: &Path) -> Result<AssetFile, AppError> {
    let data = fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(AssetFile {
        filename,
        content_base64: STANDARD.encode(&data),
        size: data.len() as u64,
    })
}
