pub mod asset_generation;
pub mod asset_store;
pub mod detection;
pub mod extractor;
pub mod imaging;
pub mod providers;

pub use asset_generation::AssetGenerator;
pub use asset_store::AssetStore;
pub use detection::DetectionService;
pub use extractor::{extract_detected_objects, CONFIDENCE_THRESHOLD};
pub use imaging::validate_image;
