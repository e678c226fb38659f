//! Inference engine boundary
//!
//! The model is opaque: a named input tensor goes in, named outputs come out.
//! [`onnx::OnnxEngine`] runs real models; [`fixed::FixedResponseEngine`]
//! returns a canned answer.

pub mod fixed;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use fixed::FixedResponseEngine;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEngine;

use std::fmt;

/// A rank-2 f32 tensor bound to a model input name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedInput {
    pub name: String,
    pub shape: [usize; 2],
    pub data: Vec<f32>,
}

/// Contents of a model output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTensor {
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    /// Output of a type this crate does not decode, described by name
    Other(String),
}

impl fmt::Display for OutputTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTensor::Int64(v) => write!(f, "int64 tensor with {} elements", v.len()),
            OutputTensor::Float32(v) => write!(f, "float32 tensor with {} elements", v.len()),
            OutputTensor::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// First output produced by a model run
#[derive(Debug, Clone, PartialEq)]
pub struct NamedOutput {
    pub name: String,
    pub value: OutputTensor,
}

/// A loaded model that can run one forward pass at a time
pub trait InferenceEngine {
    /// Input names in the order the model declares them
    fn input_names(&self) -> Vec<String>;

    /// Output names in the order the model declares them
    fn output_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Run a single inference and return the first output
    fn run_one(&self, input: NamedInput) -> crate::Result<NamedOutput>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn input_names(&self) -> Vec<String> {
        (**self).input_names()
    }

    fn output_names(&self) -> Vec<String> {
        (**self).output_names()
    }

    fn run_one(&self, input: NamedInput) -> crate::Result<NamedOutput> {
        (**self).run_one(input)
    }
}
