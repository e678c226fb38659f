//! ONNX Runtime backed engine

use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use super::{InferenceEngine, NamedInput, NamedOutput, OutputTensor};
use crate::{EngineConfig, PredictError, Result};

fn engine_err(context: &str, e: impl Display) -> PredictError {
    PredictError::Engine(format!("{}: {}", context, e))
}

/// A loaded ONNX session
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex.
/// Dropping the engine (or calling [`OnnxEngine::close`]) releases it.
pub struct OnnxEngine {
    session: Mutex<Session>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl OnnxEngine {
    /// Build a session from an in-memory model blob
    pub fn from_bytes(bytes: &[u8], config: &EngineConfig) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| engine_err("session builder", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| engine_err("optimization level", e))?
            .with_intra_threads(config.intra_threads.max(1))
            .map_err(|e| engine_err("intra threads", e))?
            .commit_from_memory(bytes)
            .map_err(|e| engine_err("load model", e))?;

        Ok(Self::from_session(session))
    }

    /// Build a session from a model file
    pub fn from_file(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| PredictError::Asset {
            name: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::from_bytes(&bytes, config)
    }

    fn from_session(session: Session) -> Self {
        let inputs: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let outputs: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        log::info!("ONNX model loaded: inputs={:?}, outputs={:?}", inputs, outputs);

        OnnxEngine {
            session: Mutex::new(session),
            inputs,
            outputs,
        }
    }

    /// Release the native session
    pub fn close(self) {
        drop(self);
        log::debug!("ONNX session released");
    }
}

impl InferenceEngine for OnnxEngine {
    fn input_names(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn output_names(&self) -> Vec<String> {
        self.outputs.clone()
    }

    fn run_one(&self, input: NamedInput) -> Result<NamedOutput> {
        let tensor = Tensor::from_array((input.shape, input.data.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| engine_err("session lock", e))?;

        let outputs = session.run(ort::inputs![input.name.as_str() => tensor])?;

        let (name, value) = outputs
            .iter()
            .next()
            .ok_or_else(|| PredictError::Engine("model produced no outputs".to_string()))?;

        let decoded = if let Ok((_, data)) = value.try_extract_tensor::<i64>() {
            OutputTensor::Int64(data.to_vec())
        } else if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
            OutputTensor::Float32(data.to_vec())
        } else {
            OutputTensor::Other(format!("{:?}", value.dtype()))
        };

        Ok(NamedOutput {
            name: name.to_string(),
            value: decoded,
        })
    }
}
