//! Fixed-response engine
//!
//! Always answers with the same output. It stands in for a real model when
//! exercising encoding and label decoding.

use std::sync::Mutex;

use super::{InferenceEngine, NamedInput, NamedOutput, OutputTensor};
use crate::{PredictError, Result};

/// Engine that returns a canned output and records what it was given
#[derive(Debug)]
pub struct FixedResponseEngine {
    input_names: Vec<String>,
    response: std::result::Result<OutputTensor, String>,
    last_input: Mutex<Option<NamedInput>>,
}

impl FixedResponseEngine {
    /// Always predict class `index`
    pub fn class_index(index: i64) -> Self {
        Self::with_output(OutputTensor::Int64(vec![index]))
    }

    /// Always return `output` as the first model output
    pub fn with_output(output: OutputTensor) -> Self {
        FixedResponseEngine {
            input_names: vec!["float_input".to_string()],
            response: Ok(output),
            last_input: Mutex::new(None),
        }
    }

    /// Fail every run with `message`
    pub fn failing(message: &str) -> Self {
        FixedResponseEngine {
            input_names: vec!["float_input".to_string()],
            response: Err(message.to_string()),
            last_input: Mutex::new(None),
        }
    }

    /// Replace the declared input names
    pub fn with_input_names(mut self, names: &[&str]) -> Self {
        self.input_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// The input passed to the most recent run
    pub fn last_input(&self) -> Option<NamedInput> {
        self.last_input.lock().ok().and_then(|guard| guard.clone())
    }
}

impl InferenceEngine for FixedResponseEngine {
    fn input_names(&self) -> Vec<String> {
        self.input_names.clone()
    }

    fn output_names(&self) -> Vec<String> {
        vec!["output_label".to_string()]
    }

    fn run_one(&self, input: NamedInput) -> Result<NamedOutput> {
        if let Ok(mut guard) = self.last_input.lock() {
            *guard = Some(input);
        }

        match &self.response {
            Ok(value) => Ok(NamedOutput {
                name: "output_label".to_string(),
                value: value.clone(),
            }),
            Err(message) => Err(PredictError::Engine(message.clone())),
        }
    }
}
