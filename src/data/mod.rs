//! Asset access and vocabularies
//!
//! The asset store that bundles the model blob and the two vocabulary files,
//! plus the ordered symptom and label vocabularies loaded from it.

pub mod assets;
pub mod vocabulary;

pub use assets::{AssetSource, DirAssets, MemoryAssets};
pub use vocabulary::{LabelVocabulary, SymptomVocabulary};
