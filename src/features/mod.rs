//! Feature extraction and encoding
//!
//! Converts a user's selected symptoms into the model's input vector.

pub mod encoding;

pub use encoding::{encode, filter_known, normalize_symptom, prepare, EncodedSymptoms, FeatureVector};
