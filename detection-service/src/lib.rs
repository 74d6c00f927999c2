//! Plastic waste detection service.
//!
//! Forwards uploaded images to a Gemini vision model, turns its reply into
//! typed detections, and generates texture variants for the asset pipeline.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
