//! Prediction and inference
//!
//! Load the model and vocabularies, then predict a disease from symptoms.

pub mod inference;

pub use inference::{Prediction, Predictor, PredictorState};
