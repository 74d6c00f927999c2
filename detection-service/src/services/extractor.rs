//! Turns the vision model's free-form reply into validated detections.

use crate::models::DetectedObject;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use validator::Validate;

/// Detections below this confidence are discarded.
pub const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// First `[ { ... } ]` span in the text, spanning newlines.
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("JSON array pattern is valid")
});

/// Extract detected objects from raw model output.
///
/// Text without an embedded array, or whose array does not decode, yields an
/// empty list. Elements are validated one at a time: an element with a
/// missing field, a wrong type, or an out-of-range confidence is dropped while
/// its siblings are kept. Survivors below [`CONFIDENCE_THRESHOLD`] are
/// filtered out; order is preserved.
pub fn extract_detected_objects(text: &str) -> Vec<DetectedObject> {
    let Some(candidate) = JSON_ARRAY.find(text) else {
        tracing::debug!("No JSON array found in model response");
        return Vec::new();
    };

    let elements: Vec<Value> = match serde_json::from_str(candidate.as_str()) {
        Ok(elements) => elements,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to decode JSON array from model response");
            return Vec::new();
        }
    };

    let total = elements.len();
    let objects: Vec<DetectedObject> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| parse_element(index, element))
        .filter(|object| object.confidence >= CONFIDENCE_THRESHOLD)
        .collect();

    tracing::debug!(
        candidates = total,
        kept = objects.len(),
        "Parsed detections from model response"
    );

    objects
}

fn parse_element(index: usize, element: Value) -> Option<DetectedObject> {
    let object: DetectedObject = match serde_json::from_value(element) {
        Ok(object) => object,
        Err(e) => {
            tracing::debug!(index, error = %e, "Dropping malformed detection");
            return None;
        }
    };

    if let Err(e) = object.validate() {
        tracing::debug!(index, error = %e, "Dropping invalid detection");
        return None;
    }

    Some(object)
}
