//! Symptom normalization and one-hot encoding

use std::sync::OnceLock;

use regex::Regex;

use crate::data::SymptomVocabulary;

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Canonical form of a symptom phrase
///
/// Trims, joins words with a single underscore and lowercases, so
/// `"  High   Fever"` becomes `"high_fever"`. Idempotent.
pub fn normalize_symptom(raw: &str) -> String {
    whitespace_run()
        .replace_all(raw.trim(), "_")
        .to_lowercase()
}

/// One-hot symptom vector aligned with a [`SymptomVocabulary`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    /// Tensor shape handed to the model: a single batch row
    pub fn shape(&self) -> [usize; 2] {
        [1, self.values.len()]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Number of active symptoms
    pub fn active(&self) -> usize {
        self.values.iter().filter(|v| **v == 1.0).count()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

/// Encode already-normalized symptoms against the vocabulary
///
/// Position `i` is 1.0 when `vocab[i]` was selected; the layout is the
/// vocabulary order and is never re-sorted.
pub fn encode<S: AsRef<str>>(selected: &[S], vocab: &SymptomVocabulary) -> FeatureVector {
    let mut values = vec![0.0f32; vocab.len()];
    for symptom in selected {
        if let Some(idx) = vocab.index_of(symptom.as_ref()) {
            values[idx] = 1.0;
        }
    }
    FeatureVector { values }
}

/// Split normalized symptoms into (known, ignored)
///
/// Unknown symptoms are logged and dropped. Repeats collapse to one entry.
pub fn filter_known(normalized: Vec<String>, vocab: &SymptomVocabulary) -> (Vec<String>, Vec<String>) {
    let mut known: Vec<String> = Vec::new();
    let mut ignored: Vec<String> = Vec::new();

    for symptom in normalized {
        if symptom.is_empty() {
            continue;
        }
        if vocab.contains(&symptom) {
            if !known.contains(&symptom) {
                known.push(symptom);
            }
        } else {
            log::info!("Ignored symptom: {}", symptom);
            if !ignored.contains(&symptom) {
                ignored.push(symptom);
            }
        }
    }

    (known, ignored)
}

/// Raw selection after normalization, filtering and encoding
#[derive(Debug, Clone)]
pub struct EncodedSymptoms {
    pub known: Vec<String>,
    pub ignored: Vec<String>,
    pub features: FeatureVector,
}

/// Normalize, filter and encode a caller's raw selection
pub fn prepare<S: AsRef<str>>(raw: &[S], vocab: &SymptomVocabulary) -> EncodedSymptoms {
    let normalized = raw.iter().map(|s| normalize_symptom(s.as_ref())).collect();
    let (known, ignored) = filter_known(normalized, vocab);
    let features = encode(&known, vocab);

    EncodedSymptoms {
        known,
        ignored,
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> SymptomVocabulary {
        SymptomVocabulary::from_lines(["fever", "cough", "chills"])
    }

    #[test]
    fn test_normalize_symptom() {
        assert_eq!(normalize_symptom("  High   Fever "), "high_fever");
        assert_eq!(normalize_symptom("pain behind the eyes"), "pain_behind_the_eyes");
        assert_eq!(normalize_symptom("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Joint Pain", "loss_of_appetite", " Muscle\tPain ", "MALAISE"] {
            let once = normalize_symptom(raw);
            assert_eq!(normalize_symptom(&once), once);
        }
    }

    #[test]
    fn test_prepare_folds_case_and_drops_unknown() {
        let encoded = prepare(&["Fever", "unknown_symptom"], &vocab());

        assert_eq!(encoded.features.as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(encoded.known, vec!["fever"]);
        assert_eq!(encoded.ignored, vec!["unknown_symptom"]);
    }

    #[test]
    fn test_encode_length_and_values() {
        let vocab = vocab();
        for selected in [vec![], vec!["cough"], vec!["chills", "fever", "cough"]] {
            let features = encode(&selected, &vocab);
            assert_eq!(features.len(), vocab.len());
            assert_eq!(features.shape(), [1, vocab.len()]);
            assert!(features.as_slice().iter().all(|v| *v == 0.0 || *v == 1.0));
            assert_eq!(features.active(), selected.len());
        }
    }

    #[test]
    fn test_unknown_symptoms_do_not_change_vector() {
        let vocab = vocab();
        let base = prepare(&["cough"], &vocab);
        let noisy = prepare(&["cough", "sneezing", "Blurred Vision"], &vocab);

        assert_eq!(base.features, noisy.features);
        assert_eq!(noisy.ignored.len(), 2);
    }

    #[test]
    fn test_vector_follows_vocabulary_order() {
        let features = encode(&["chills", "fever"], &vocab());
        assert_eq!(features.into_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_vocabulary_encodes_to_empty_vector() {
        let vocab = SymptomVocabulary::default();
        let encoded = prepare(&["fever"], &vocab);

        assert!(encoded.features.is_empty());
        assert_eq!(encoded.features.shape(), [1, 0]);
        assert_eq!(encoded.ignored, vec!["fever"]);
    }

    #[test]
    fn test_duplicate_selection_collapses() {
        let encoded = prepare(&["Cough", "cough ", " COUGH"], &vocab());
        assert_eq!(encoded.known, vec!["cough"]);
        assert_eq!(encoded.features.active(), 1);
    }
}
