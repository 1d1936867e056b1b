use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, SmsfinError};

/// Batch text classifier: one label per message, in input order.
pub trait CategoryClassifier {
    fn predict(&self, messages: &[String]) -> Result<Vec<String>>;
}

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<String> {
    Some("l2".to_string())
}

/// Bag-of-words / TF-IDF feature extractor exported by the training toolchain.
#[derive(Debug, Clone, Deserialize)]
pub struct Vectorizer {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<String>,
}

impl Vectorizer {
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let n = self.n_features();
        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, i)| **i >= n) {
            return Err(format!("vocabulary index {idx} for '{term}' is out of range for {n} features"));
        }
        if let Some(idf) = &self.idf {
            if idf.len() != n {
                return Err(format!("idf has {} weights for {n} features", idf.len()));
            }
        }
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(format!("invalid ngram_range ({lo}, {hi})"));
        }
        match self.norm.as_deref() {
            None | Some("l2") | Some("l1") => Ok(()),
            Some(other) => Err(format!("unsupported norm '{other}'")),
        }
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lower).map(|m| m.as_str()).collect();
        let (lo, hi) = self.ngram_range;
        let mut terms = Vec::new();
        for n in lo..=hi {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Sparse feature vector for one message as (column, weight) pairs.
    pub fn transform_one(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let w = self.idf.as_ref().map_or(1.0, |idf| idf[idx]);
                (idx, tf * w)
            })
            .collect();
        features.sort_by_key(|(idx, _)| *idx);

        let norm = match self.norm.as_deref() {
            Some("l2") => features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some("l1") => features.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            _ => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in &mut features {
                *v /= norm;
            }
        }
        features
    }
}

/// Linear one-vs-rest classifier: score = coef[k] . x + intercept[k].
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearModel {
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("model has no classes".to_string());
        }
        let expected_rows = if self.classes.len() == 2 && self.coef.len() == 1 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows {
            return Err(format!(
                "coef has {} rows for {} classes",
                self.coef.len(),
                self.classes.len()
            ));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(format!(
                "intercept has {} values for {} coef rows",
                self.intercept.len(),
                self.coef.len()
            ));
        }
        if let Some(row) = self.coef.iter().find(|r| r.len() != n_features) {
            return Err(format!(
                "coef row has {} weights but the vectorizer produces {n_features} features",
                row.len()
            ));
        }
        Ok(())
    }

    fn score(&self, row: usize, features: &[(usize, f64)]) -> f64 {
        let weights = &self.coef[row];
        features.iter().map(|(i, v)| weights[*i] * v).sum::<f64>() + self.intercept[row]
    }

    pub fn predict_one(&self, features: &[(usize, f64)]) -> &str {
        if self.coef.len() == 1 && self.classes.len() == 2 {
            let idx = if self.score(0, features) > 0.0 { 1 } else { 0 };
            return &self.classes[idx];
        }
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for row in 0..self.coef.len() {
            let s = self.score(row, features);
            if s > best_score {
                best = row;
                best_score = s;
            }
        }
        &self.classes[best]
    }
}

/// Loaded vectorizer + model pair. Built once per process and borrowed
/// read-only by every pipeline run.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    vectorizer: Vectorizer,
    model: LinearModel,
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| SmsfinError::ModelLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| SmsfinError::ModelLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl ModelHandle {
    fn from_parts(
        vectorizer: Vectorizer,
        model: LinearModel,
        vectorizer_path: &Path,
        model_path: &Path,
    ) -> Result<Self> {
        vectorizer.validate().map_err(|reason| SmsfinError::ModelLoad {
            path: vectorizer_path.to_path_buf(),
            reason,
        })?;
        model
            .validate(vectorizer.n_features())
            .map_err(|reason| SmsfinError::ModelLoad {
                path: model_path.to_path_buf(),
                reason,
            })?;
        Ok(Self { vectorizer, model })
    }

    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Result<Self> {
        let vectorizer: Vectorizer = read_artifact(vectorizer_path)?;
        let model: LinearModel = read_artifact(model_path)?;
        Self::from_parts(vectorizer, model, vectorizer_path, model_path)
    }

    pub fn classes(&self) -> &[String] {
        &self.model.classes
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.n_features()
    }
}

impl CategoryClassifier for ModelHandle {
    fn predict(&self, messages: &[String]) -> Result<Vec<String>> {
        Ok(messages
            .iter()
            .map(|m| {
                let x = self.vectorizer.transform_one(m);
                self.model.predict_one(&x).to_string()
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn build(vectorizer: Vectorizer, model: LinearModel) -> Result<ModelHandle> {
        ModelHandle::from_parts(
            vectorizer,
            model,
            Path::new("vectorizer.json"),
            Path::new("category_model.json"),
        )
    }

    /// Three-class model keyed on a handful of obvious words.
    pub(crate) fn sample_handle() -> ModelHandle {
        let vocab = ["swiggy", "zomato", "amazon", "flipkart", "electricity", "salary"];
        let vectorizer = Vectorizer {
            vocabulary: vocab
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i))
                .collect(),
            idf: None,
            ngram_range: (1, 1),
            sublinear_tf: false,
            norm: Some("l2".to_string()),
        };
        let model = LinearModel {
            classes: vec!["Food".into(), "Shopping".into(), "Bills".into()],
            coef: vec![
                vec![2.0, 2.0, 0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 2.0, 2.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0, 2.0, 0.5],
            ],
            intercept: vec![0.1, 0.0, 0.0],
        };
        build(vectorizer, model).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_predict_preserves_order_and_length() {
        let handle = sample_handle();
        let labels = handle
            .predict(&strings(&[
                "inr 300 paid to zomato",
                "amazon order inr 999",
                "electricity bill inr 1,200",
                "otp 1234",
            ]))
            .unwrap();
        assert_eq!(labels, vec!["Food", "Shopping", "Bills", "Food"]);
    }

    #[test]
    fn test_empty_batch() {
        let handle = sample_handle();
        assert!(handle.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_tokens_need_two_word_chars() {
        let handle = sample_handle();
        let v = &handle.vectorizer;
        assert_eq!(v.terms("a swiggy b"), vec!["swiggy"]);
    }

    #[test]
    fn test_bigrams_and_idf() {
        let vectorizer = Vectorizer {
            vocabulary: [("bill".to_string(), 0), ("electricity bill".to_string(), 1)]
                .into_iter()
                .collect(),
            idf: Some(vec![1.0, 3.0]),
            ngram_range: (1, 2),
            sublinear_tf: false,
            norm: None,
        };
        let x = vectorizer.transform_one("Electricity Bill");
        assert_eq!(x, vec![(0, 1.0), (1, 3.0)]);
    }

    #[test]
    fn test_l2_norm() {
        let handle = sample_handle();
        let x = handle.vectorizer.transform_one("swiggy zomato");
        let norm: f64 = x.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_binary_single_row() {
        let vectorizer = Vectorizer {
            vocabulary: [("uber".to_string(), 0)].into_iter().collect(),
            idf: None,
            ngram_range: (1, 1),
            sublinear_tf: false,
            norm: None,
        };
        let model = LinearModel {
            classes: vec!["Other".into(), "Travel".into()],
            coef: vec![vec![1.0]],
            intercept: vec![-0.5],
        };
        let handle = build(vectorizer, model).unwrap();
        let labels = handle
            .predict(&strings(&["uber ride inr 200", "inr 200 at store"]))
            .unwrap();
        assert_eq!(labels, vec!["Travel", "Other"]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let vectorizer = Vectorizer {
            vocabulary: [("uber".to_string(), 0)].into_iter().collect(),
            idf: None,
            ngram_range: (1, 1),
            sublinear_tf: false,
            norm: None,
        };
        let model = LinearModel {
            classes: vec!["A".into(), "B".into(), "C".into()],
            coef: vec![vec![1.0], vec![1.0]],
            intercept: vec![0.0, 0.0],
        };
        let err = build(vectorizer, model).unwrap_err();
        assert!(matches!(err, SmsfinError::ModelLoad { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let vec_path = dir.path().join("vectorizer.json");
        let model_path = dir.path().join("category_model.json");
        std::fs::write(
            &vec_path,
            r#"{"vocabulary": {"uber": 0, "swiggy": 1}, "idf": [1.5, 1.2]}"#,
        )
        .unwrap();
        std::fs::write(
            &model_path,
            r#"{"classes": ["Travel", "Food"], "coef": [[1.0, 0.0], [0.0, 1.0]], "intercept": [0.0, 0.0]}"#,
        )
        .unwrap();
        let handle = ModelHandle::load(&model_path, &vec_path).unwrap();
        assert_eq!(handle.classes(), ["Travel", "Food"]);
        let labels = handle.predict(&strings(&["swiggy inr 120"])).unwrap();
        assert_eq!(labels, vec!["Food"]);
    }

    #[test]
    fn test_missing_artifact_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelHandle::load(
            &dir.path().join("nope.json"),
            &dir.path().join("also-nope.json"),
        )
        .unwrap_err();
        match err {
            SmsfinError::ModelLoad { path, .. } => {
                assert!(path.ends_with("also-nope.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_corrupt_artifact_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let vec_path = dir.path().join("vectorizer.json");
        std::fs::write(&vec_path, "not json").unwrap();
        let err = ModelHandle::load(&dir.path().join("m.json"), &vec_path).unwrap_err();
        assert!(matches!(err, SmsfinError::ModelLoad { .. }));
    }
}
