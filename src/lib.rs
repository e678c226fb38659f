//! Symptom-based disease prediction
//!
//! Loads a quantized ONNX classifier with its symptom and label vocabularies,
//! one-hot encodes a user's selected symptoms and decodes the predicted class.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use data::{AssetSource, DirAssets, LabelVocabulary, MemoryAssets, SymptomVocabulary};
pub use features::{encode, normalize_symptom, FeatureVector};
pub use model::{InferenceEngine, NamedInput, NamedOutput, OutputTensor};
pub use predict::{Prediction, Predictor, PredictorState};

/// Prediction failures
///
/// The `Display` text of each variant is what [`Predictor::predict`] hands
/// back to the calling UI.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Error: inference session not initialized.")]
    NotInitialized,

    #[error("Error: symptom vocabulary is empty.")]
    VocabEmpty,

    #[error("Error during inference: {0}")]
    Engine(String),

    #[error("Error during inference: unexpected model output ({0})")]
    ResultMismatch(String),

    #[error("Error: invalid label index ({0})")]
    IndexOutOfRange(i64),

    #[error("Failed to read asset {name}: {source}")]
    Asset {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "onnx")]
impl From<ort::Error> for PredictError {
    fn from(e: ort::Error) -> Self {
        PredictError::Engine(format!("onnx runtime: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub assets: AssetConfig,
    pub engine: EngineConfig,
}

/// Where the model and vocabularies live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub dir: String,
    pub model_file: String,
    pub symptoms_file: String,
    pub labels_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Threads used inside a single operator
    pub intra_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            assets: AssetConfig::default(),
            engine: EngineConfig { intra_threads: 1 },
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            dir: "assets".to_string(),
            model_file: "healthcare_model_quantized.onnx".to_string(),
            symptoms_file: "symptomes.txt".to_string(),
            labels_file: "label.txt".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.model_file)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PredictError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PredictError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PredictError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
