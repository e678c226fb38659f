//! Symptom-to-disease inference

use serde::Serialize;

use crate::data::{AssetSource, LabelVocabulary, SymptomVocabulary};
use crate::features::prepare;
use crate::model::{InferenceEngine, NamedInput, OutputTensor};
use crate::{AssetConfig, PredictError, Result};

/// Lifecycle of a [`Predictor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictorState {
    Uninitialized,
    Ready,
    /// The model could not be loaded; holds the reason
    InitializationFailed(String),
}

/// Outcome of a successful prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: String,
    /// Model class index the label was decoded from
    pub index: i64,
    /// Normalized symptoms that were encoded
    pub known_symptoms: Vec<String>,
    /// Normalized symptoms absent from the vocabulary
    pub ignored_symptoms: Vec<String>,
}

/// Predictor for disease labels from selected symptoms
pub struct Predictor<E: InferenceEngine> {
    state: PredictorState,
    engine: Option<E>,
    symptoms: SymptomVocabulary,
    labels: LabelVocabulary,
}

impl<E: InferenceEngine> Predictor<E> {
    /// Create a ready predictor from loaded parts
    pub fn new(symptoms: SymptomVocabulary, labels: LabelVocabulary, engine: E) -> Self {
        log::info!(
            "Predictor ready: {} symptoms, {} labels, inputs={:?}, outputs={:?}",
            symptoms.len(),
            labels.len(),
            engine.input_names(),
            engine.output_names()
        );
        Predictor {
            state: PredictorState::Ready,
            engine: Some(engine),
            symptoms,
            labels,
        }
    }

    /// A predictor with no model; every prediction reports it is uninitialized
    pub fn uninitialized() -> Self {
        Predictor {
            state: PredictorState::Uninitialized,
            engine: None,
            symptoms: SymptomVocabulary::default(),
            labels: LabelVocabulary::default(),
        }
    }

    /// Load vocabularies and model from an asset store
    ///
    /// Vocabulary failures degrade to empty vocabularies. A model that cannot
    /// be read or loaded leaves the predictor in
    /// [`PredictorState::InitializationFailed`]; this never panics.
    pub fn initialize<F>(assets: &dyn AssetSource, config: &AssetConfig, load_engine: F) -> Self
    where
        F: FnOnce(&[u8]) -> Result<E>,
    {
        let symptoms = SymptomVocabulary::load(assets, &config.symptoms_file);
        let labels = LabelVocabulary::load(assets, &config.labels_file);

        let engine = assets
            .read_bytes(&config.model_file)
            .map_err(|e| PredictError::Asset {
                name: config.model_file.clone(),
                source: e,
            })
            .and_then(|bytes| {
                log::debug!("Read model {} ({} bytes)", config.model_file, bytes.len());
                load_engine(&bytes)
            });

        match engine {
            Ok(engine) => Self::new(symptoms, labels, engine),
            Err(e) => {
                log::error!("Predictor initialization failed: {}", e);
                Predictor {
                    state: PredictorState::InitializationFailed(e.to_string()),
                    engine: None,
                    symptoms,
                    labels,
                }
            }
        }
    }

    pub fn state(&self) -> &PredictorState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == PredictorState::Ready
    }

    pub fn symptoms(&self) -> &SymptomVocabulary {
        &self.symptoms
    }

    pub fn labels(&self) -> &LabelVocabulary {
        &self.labels
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Predict a label, or a human-readable error message
    ///
    /// Never fails: every error becomes its display string.
    pub fn predict<S: AsRef<str>>(&self, selected: &[S]) -> String {
        match self.try_predict(selected) {
            Ok(prediction) => prediction.label,
            Err(e) => e.to_string(),
        }
    }

    /// Predict a label with a typed error
    pub fn try_predict<S: AsRef<str>>(&self, selected: &[S]) -> Result<Prediction> {
        let engine = match (&self.state, &self.engine) {
            (PredictorState::Ready, Some(engine)) => engine,
            _ => {
                log::warn!("Prediction requested but predictor is {:?}", self.state);
                return Err(PredictError::NotInitialized);
            }
        };

        if self.symptoms.is_empty() {
            log::error!("Prediction requested with an empty symptom vocabulary");
            return Err(PredictError::VocabEmpty);
        }

        let encoded = prepare(selected, &self.symptoms);

        let result = self.run(engine, encoded.features.shape(), encoded.features.as_slice());
        let index = match result {
            Ok(index) => index,
            Err(e) => {
                log::error!("Inference failed: {}", e);
                return Err(e);
            }
        };

        log::debug!("Valid symptoms: {:?}", encoded.known);
        log::debug!("Encoded vector: {:?}", encoded.features.as_slice());
        log::debug!("Predicted index: {}", index);

        match self.labels.get(index) {
            Some(label) => {
                log::debug!("Predicted label: {}", label);
                Ok(Prediction {
                    label: label.to_string(),
                    index,
                    known_symptoms: encoded.known,
                    ignored_symptoms: encoded.ignored,
                })
            }
            None => {
                log::error!(
                    "Predicted index {} outside {} labels",
                    index,
                    self.labels.len()
                );
                Err(PredictError::IndexOutOfRange(index))
            }
        }
    }

    /// One forward pass, decoded to a class index
    fn run(&self, engine: &E, shape: [usize; 2], data: &[f32]) -> Result<i64> {
        let input_names = engine.input_names();
        let name = input_names
            .first()
            .cloned()
            .ok_or_else(|| PredictError::Engine("model declares no inputs".to_string()))?;
        if input_names.len() > 1 {
            log::warn!(
                "Model declares {} inputs; binding features to the first ({})",
                input_names.len(),
                name
            );
        }

        let output = engine.run_one(NamedInput {
            name,
            shape,
            data: data.to_vec(),
        })?;

        match output.value {
            OutputTensor::Int64(values) => values.first().copied().ok_or_else(|| {
                PredictError::ResultMismatch(format!("output {} is empty", output.name))
            }),
            other => Err(PredictError::ResultMismatch(format!(
                "output {} is {}, expected int64 class index",
                output.name, other
            ))),
        }
    }

    /// Release the engine and its native session
    pub fn shutdown(self) {
        if let Some(engine) = self.engine {
            drop(engine);
            log::info!("Inference engine released");
        }
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &Prediction) -> String {
    let ignored = if pred.ignored_symptoms.is_empty() {
        "-".to_string()
    } else {
        pred.ignored_symptoms.join(", ")
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Prediction:  {}
├─────────────────────────────────────────────────┤
│  Class index: {}
│  Symptoms:    {}
│  Ignored:     {}
└─────────────────────────────────────────────────┘
"#,
        pred.label,
        pred.index,
        pred.known_symptoms.join(", "),
        ignored
    )
}
