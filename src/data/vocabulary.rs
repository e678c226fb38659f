//! Symptom and label vocabularies
//!
//! Both are ordered and index-stable for the lifetime of the process: the
//! symptom order fixes the feature vector layout, the label order must match
//! the model's output classes.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};

use crate::data::AssetSource;
use crate::features::normalize_symptom;

/// Ordered list of canonical symptom tokens
#[derive(Debug, Clone, Default)]
pub struct SymptomVocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    /// Build from raw lines, normalizing each and dropping empties
    ///
    /// Repeated tokens keep their first position. The vector then has fewer
    /// columns than the file has lines, which misaligns it against a model
    /// trained on the uncollapsed list.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = SymptomVocabulary::default();
        for line in lines {
            let token = normalize_symptom(line.as_ref());
            if token.is_empty() {
                continue;
            }
            if vocab.index.contains_key(&token) {
                log::warn!(
                    "Duplicate symptom {} dropped; feature width no longer matches the vocabulary file",
                    token
                );
                continue;
            }
            vocab.index.insert(token.clone(), vocab.tokens.len());
            vocab.tokens.push(token);
        }
        vocab
    }

    /// Load from a newline-delimited asset
    ///
    /// An unreadable asset is logged and yields an empty vocabulary.
    pub fn load(assets: &dyn AssetSource, name: &str) -> Self {
        match read_lines(assets, name) {
            Ok(lines) => Self::from_lines(lines),
            Err(e) => {
                log::error!("Failed to load symptom vocabulary {}: {}", name, e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

/// Ordered list of disease labels; index `i` is model class `i`
#[derive(Debug, Clone, Default)]
pub struct LabelVocabulary {
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Build from raw lines, trimming each and dropping empties
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        LabelVocabulary {
            labels: lines
                .into_iter()
                .filter_map(|line| clean_label(line.as_ref()))
                .collect(),
        }
    }

    /// Load from a newline-delimited asset
    ///
    /// An unreadable asset is logged and yields an empty vocabulary.
    pub fn load(assets: &dyn AssetSource, name: &str) -> Self {
        match read_lines(assets, name) {
            Ok(lines) => Self::from_lines(lines),
            Err(e) => {
                log::error!("Failed to load label vocabulary {}: {}", name, e);
                Self::default()
            }
        }
    }

    /// Label for a model class index, if it is in range
    pub fn get(&self, class: i64) -> Option<&str> {
        usize::try_from(class)
            .ok()
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Trim a label; case is preserved
pub fn clean_label(raw: &str) -> Option<String> {
    let label = raw.trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

fn read_lines(assets: &dyn AssetSource, name: &str) -> std::io::Result<Vec<String>> {
    let reader = BufReader::new(assets.open(name)?);
    reader.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryAssets;

    #[test]
    fn test_symptom_vocabulary_normalizes_lines() {
        let vocab = SymptomVocabulary::from_lines(["  High Fever ", "", "Joint  Pain", "cough"]);

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.get(0), Some("high_fever"));
        assert_eq!(vocab.get(1), Some("joint_pain"));
        assert_eq!(vocab.index_of("cough"), Some(2));
        assert!(!vocab.contains("High Fever"));
    }

    #[test]
    fn test_symptom_vocabulary_drops_duplicates() {
        let vocab = SymptomVocabulary::from_lines(["fever", "Fever", "chills"]);

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["fever", "chills"]);
    }

    #[test]
    fn test_blank_and_repeated_lines_narrow_the_vector() {
        let vocab = SymptomVocabulary::from_lines(["fever", "Fever", "   ", "chills"]);

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.index_of("chills"), Some(1));
    }

    #[test]
    fn test_labels_keep_case() {
        let labels = LabelVocabulary::from_lines([" Dengue ", "", "Common Cold"]);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(0), Some("Dengue"));
        assert_eq!(labels.get(1), Some("Common Cold"));
        assert_eq!(labels.get(2), None);
        assert_eq!(labels.get(-1), None);
    }

    #[test]
    fn test_load_from_assets() {
        let assets = MemoryAssets::new()
            .with("symptomes.txt", "itching\nskin rash\r\n")
            .with("label.txt", "Fungal infection\nAllergy\n");

        let symptoms = SymptomVocabulary::load(&assets, "symptomes.txt");
        let labels = LabelVocabulary::load(&assets, "label.txt");

        assert_eq!(symptoms.iter().collect::<Vec<_>>(), vec!["itching", "skin_rash"]);
        assert_eq!(labels.get(1), Some("Allergy"));
    }

    #[test]
    fn test_missing_asset_degrades_to_empty() {
        let assets = MemoryAssets::new();

        let symptoms = SymptomVocabulary::load(&assets, "symptomes.txt");
        let labels = LabelVocabulary::load(&assets, "label.txt");

        assert!(symptoms.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_invalid_utf8_degrades_to_empty() {
        let assets = MemoryAssets::new().with("label.txt", vec![0xff, 0xfe, b'\n']);
        assert!(LabelVocabulary::load(&assets, "label.txt").is_empty());
    }
}
