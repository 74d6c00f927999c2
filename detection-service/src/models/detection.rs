use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Category of plastic waste the vision model may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlasticType {
    Cup,
    Bottle,
    Container,
}

impl PlasticType {
    pub const ALL: [PlasticType; 3] = [PlasticType::Cup, PlasticType::Bottle, PlasticType::Container];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlasticType::Cup => "cup",
            PlasticType::Bottle => "bottle",
            PlasticType::Container => "container",
        }
    }
}

impl fmt::Display for PlasticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteStatus {
    Clean,
    Dirty,
}

impl WasteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteStatus::Clean => "clean",
            WasteStatus::Dirty => "dirty",
        }
    }
}

impl fmt::Display for WasteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Box coordinates as `[ymin, xmin, ymax, xmax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox(pub [f64; 4]);

impl BoundingBox {
    pub fn ymin(&self) -> f64 {
        self.0[0]
    }

    pub fn xmin(&self) -> f64 {
        self.0[1]
    }

    pub fn ymax(&self) -> f64 {
        self.0[2]
    }

    pub fn xmax(&self) -> f64 {
        self.0[3]
    }
}

/// A single object reported by the vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DetectedObject {
    pub label: PlasticType,

    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,

    pub status: WasteStatus,

    #[serde(default, alias = "description")]
    pub how_to_recycle: Option<String>,

    #[serde(default)]
    pub box_2d: Option<BoundingBox>,
}

/// Detection API response.
///
/// Build it with [`DetectionResponse::from_objects`] or
/// [`DetectionResponse::failure`] so `total_objects` always matches
/// `objects.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub objects: Vec<DetectedObject>,
    pub total_objects: usize,
}

impl DetectionResponse {
    /// An empty object list is reported as a failed detection.
    pub fn from_objects(objects: Vec<DetectedObject>) -> Self {
        Self {
            success: !objects.is_empty(),
            total_objects: objects.len(),
            objects,
        }
    }

    pub fn failure() -> Self {
        Self::from_objects(Vec::new())
    }
}
