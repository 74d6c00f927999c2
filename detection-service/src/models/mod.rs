//! Domain models for the detection service.

pub mod asset;
pub mod detection;

pub use asset::{AssetFile, AssetQuery, AssetResponse, AssetType};
pub use detection::{BoundingBox, DetectedObject, DetectionResponse, PlasticType, WasteStatus};
