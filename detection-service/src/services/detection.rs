use crate::models::{DetectionResponse, PlasticType, WasteStatus};
use crate::services::extractor::extract_detected_objects;
use crate::services::imaging;
use crate::services::providers::{GenerationParams, ImageInput, VisionProvider};
use serde_json::json;
use std::sync::Arc;

/// Instruction sent with every detection request.
pub fn detection_prompt() -> String {
    let labels: Vec<&str> = PlasticType::ALL.iter().map(|l| l.as_str()).collect();
    format!(
        "Detect all plastic waste in the image. \
         Label will be one of the following: {}. \
         The box_2d should be [ymin, xmin, ymax, xmax]. \
         Describe its status as either {} or {}. \
         Provide a how_to_recycle description for each detected object.",
        labels.join(", "),
        WasteStatus::Clean,
        WasteStatus::Dirty
    )
}

/// Response schema handed to the model, describing a list of detections.
pub fn detection_schema() -> serde_json::Value {
    let labels: Vec<&str> = PlasticType::ALL.iter().map(|l| l.as_str()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "label": { "type": "STRING", "enum": labels },
                "confidence": { "type": "NUMBER" },
                "status": {
                    "type": "STRING",
                    "enum": [WasteStatus::Clean.as_str(), WasteStatus::Dirty.as_str()]
                },
                "how_to_recycle": { "type": "STRING", "nullable": true },
                "box_2d": {
                    "type": "ARRAY",
                    "items": { "type": "NUMBER" },
                    "nullable": true
                }
            },
            "required": ["label", "confidence", "status"]
        }
    })
}

/// Runs object detection on validated uploads.
#[derive(Clone)]
pub struct DetectionService {
    provider: Arc<dyn VisionProvider>,
    max_image_dimension: u32,
}

impl DetectionService {
    pub fn new(provider: Arc<dyn VisionProvider>, max_image_dimension: u32) -> Self {
        Self {
            provider,
            max_image_dimension,
        }
    }

    /// Detect plastic waste in `image_data`.
    ///
    /// Provider and parsing failures are reported as an unsuccessful,
    /// empty response rather than an error.
    pub async fn detect(&self, image_data: &[u8]) -> DetectionResponse {
        let data = imaging::resize_image(image_data, self.max_image_dimension);
        let mime_type = imaging::detect_format(&data)
            .map(imaging::mime_type)
            .unwrap_or("application/octet-stream");

        let image = ImageInput {
            mime_type: mime_type.to_string(),
            data,
        };
        let params = GenerationParams {
            response_schema: Some(detection_schema()),
            ..Default::default()
        };

        let response = match self
            .provider
            .generate(&detection_prompt(), &image, &params)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(model = %self.provider.model(), error = %e, "Detection request failed");
                return DetectionResponse::failure();
            }
        };

        let Some(text) = response.text else {
            tracing::info!("Detection response was empty");
            return DetectionResponse::failure();
        };

        let objects = extract_detected_objects(&text);
        if objects.is_empty() {
            tracing::info!("No plastic waste detected");
        } else {
            tracing::info!(
                total_objects = objects.len(),
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "Detection completed"
            );
        }

        DetectionResponse::from_objects(objects)
    }
}
