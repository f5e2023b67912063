use crate::error::{AppError, Result};
use crate::metrics::UNSEEN_CATEGORIES_TOTAL;
use crate::ml::encoder::{CategoricalEncoders, LabelEncoder, UNSEEN_CODE};
use crate::ml::models::Target;
use crate::ml::vectorizer::NgramVectorizer;
use crate::models::AssetRecord;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Number of octet columns derived from the IP address
pub const IP_PARTS: usize = 4;

/// Ordered list of feature column names, frozen at training time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Named numeric feature matrix, one row per record
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    schema: FeatureSchema,
    values: Array2<f64>,
}

impl FeatureFrame {
    pub fn new(schema: FeatureSchema, values: Array2<f64>) -> Result<Self> {
        if values.ncols() != schema.len() {
            return Err(AppError::Internal(format!(
                "feature matrix has {} columns but schema names {}",
                values.ncols(),
                schema.len()
            )));
        }
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Value of a named column in one row
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.schema.position(column)?;
        self.values.get((row, col)).copied()
    }

    /// Copy of the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Array2<f64> {
        self.values.select(Axis(0), rows)
    }

    /// Matrix with exactly the columns of `schema`, in its order
    ///
    /// Columns this frame does not carry are filled with 0; columns the
    /// schema does not name are dropped.
    pub fn reindex(&self, schema: &FeatureSchema) -> Array2<f64> {
        let positions: HashMap<&str, usize> = self
            .schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut out = Array2::zeros((self.n_rows(), schema.len()));
        for (dst, name) in schema.columns().iter().enumerate() {
            if let Some(&src) = positions.get(name.as_str()) {
                out.column_mut(dst).assign(&self.values.column(src));
            }
        }
        out
    }
}

/// Label codes for both targets, aligned with the rows of a fitted frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCodes {
    pub system_owner: Vec<i64>,
    pub application_owner: Vec<i64>,
}

impl TargetCodes {
    pub fn get(&self, target: Target) -> &[i64] {
        match target {
            Target::SystemOwner => &self.system_owner,
            Target::ApplicationOwner => &self.application_owner,
        }
    }
}

/// Split an IP address into four integer features
///
/// Anything that is not four dot-separated parts yields all zeros. Each part
/// that is not purely ASCII digits becomes 0.
pub fn ip_to_features(ip: &str) -> [i64; IP_PARTS] {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != IP_PARTS {
        return [0; IP_PARTS];
    }

    let mut out = [0; IP_PARTS];
    for (slot, part) in out.iter_mut().zip(parts) {
        if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
            *slot = part.parse().unwrap_or(0);
        }
    }
    out
}

fn ip_column(idx: usize) -> String {
    format!("ip_part_{}", idx)
}

/// Fits encoders and the hostname vectorizer over a training set
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    ngram_range: (usize, usize),
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self { ngram_range: (2, 4) }
    }
}

impl FeatureExtractor {
    pub fn new(ngram_range: (usize, usize)) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(AppError::Configuration(format!(
                "invalid n-gram range {}..={}",
                min_n, max_n
            )));
        }
        Ok(Self { ngram_range })
    }

    /// Fit mode: build fresh encoders and vocabulary, then extract features
    pub fn fit(&self, rows: &[AssetRecord]) -> Result<(FeatureFrame, TargetCodes, FittedFeatures)> {
        if rows.is_empty() {
            return Err(AppError::Dataset("cannot fit features on an empty dataset".to_string()));
        }

        let encoders = CategoricalEncoders {
            location: LabelEncoder::fit(rows.iter().map(|r| r.location.as_str())),
            operating_system: LabelEncoder::fit(rows.iter().map(|r| r.operating_system.as_str())),
            system_owner: LabelEncoder::fit(rows.iter().map(|r| label(&r.system_owner))),
            application_owner: LabelEncoder::fit(rows.iter().map(|r| label(&r.application_owner))),
        };
        let vectorizer =
            NgramVectorizer::fit(rows.iter().map(|r| r.hostname.as_str()), self.ngram_range);

        let targets = TargetCodes {
            system_owner: rows
                .iter()
                .map(|r| encoders.system_owner.transform(label(&r.system_owner)))
                .collect(),
            application_owner: rows
                .iter()
                .map(|r| encoders.application_owner.transform(label(&r.application_owner)))
                .collect(),
        };

        let fitted = FittedFeatures {
            encoders,
            vectorizer,
        };
        let frame = fitted.build_frame(rows, false)?;

        debug!(
            rows = rows.len(),
            columns = frame.schema().len(),
            vocab_size = fitted.vectorizer.vocab_size(),
            "Fitted feature extractor"
        );

        Ok((frame, targets, fitted))
    }
}

fn label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Encoders and vocabulary produced by a fit, reused for inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedFeatures {
    pub encoders: CategoricalEncoders,
    pub vectorizer: NgramVectorizer,
}

impl FittedFeatures {
    /// Transform mode: encode rows with the fitted state, never refitting
    ///
    /// Unseen categorical values become [`UNSEEN_CODE`].
    pub fn transform(&self, rows: &[AssetRecord]) -> Result<FeatureFrame> {
        self.build_frame(rows, true)
    }

    /// Column order produced by this fit
    pub fn schema(&self) -> FeatureSchema {
        let mut columns = vec!["location".to_string(), "operating_system".to_string()];
        columns.extend(self.vectorizer.feature_names());
        columns.extend((0..IP_PARTS).map(ip_column));
        FeatureSchema::new(columns)
    }

    /// Encoder for a prediction target
    pub fn target_encoder(&self, target: Target) -> &LabelEncoder {
        match target {
            Target::SystemOwner => &self.encoders.system_owner,
            Target::ApplicationOwner => &self.encoders.application_owner,
        }
    }

    fn build_frame(&self, rows: &[AssetRecord], count_unseen: bool) -> Result<FeatureFrame> {
        let schema = self.schema();
        let vocab = self.vectorizer.vocab_size();
        let mut values = Array2::zeros((rows.len(), schema.len()));

        for (i, row) in rows.iter().enumerate() {
            let location = self.encoders.location.transform(&row.location);
            let os = self.encoders.operating_system.transform(&row.operating_system);
            if count_unseen {
                if location == UNSEEN_CODE {
                    UNSEEN_CATEGORIES_TOTAL.with_label_values(&["location"]).inc();
                }
                if os == UNSEEN_CODE {
                    UNSEEN_CATEGORIES_TOTAL
                        .with_label_values(&["operating_system"])
                        .inc();
                }
            }

            values[[i, 0]] = location as f64;
            values[[i, 1]] = os as f64;
            for (j, count) in self.vectorizer.transform(&row.hostname).into_iter().enumerate() {
                values[[i, 2 + j]] = count;
            }
            for (j, part) in ip_to_features(&row.ip).into_iter().enumerate() {
                values[[i, 2 + vocab + j]] = part as f64;
            }
        }

        FeatureFrame::new(schema, values)
    }
}
