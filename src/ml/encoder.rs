use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Code returned for values that were not observed while fitting
pub const UNSEEN_CODE: i64 = -1;

/// Dense bijection between observed string values and integer codes
///
/// Classes are sorted, so codes are stable for a given set of values
/// regardless of row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Fit an encoder over the distinct values of a column
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: Vec<String> = values
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self::from_classes(classes)
    }

    fn from_classes(mut classes: Vec<String>) -> Self {
        classes.sort();
        classes.dedup();
        let index = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.clone(), code as i64))
            .collect();

        Self { classes, index }
    }

    /// Code for a value, or `None` if it was never seen
    pub fn try_transform(&self, value: &str) -> Option<i64> {
        self.index.get(value).copied()
    }

    /// Code for a value, mapping unseen values to [`UNSEEN_CODE`]
    pub fn transform(&self, value: &str) -> i64 {
        self.try_transform(value).unwrap_or(UNSEEN_CODE)
    }

    /// Original value for a code
    pub fn inverse_transform(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl From<Vec<String>> for LabelEncoder {
    fn from(classes: Vec<String>) -> Self {
        Self::from_classes(classes)
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}

/// One encoder per categorical column of an asset record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEncoders {
    pub location: LabelEncoder,
    pub operating_system: LabelEncoder,
    pub system_owner: LabelEncoder,
    pub application_owner: LabelEncoder,
}
