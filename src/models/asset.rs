use serde::{Deserialize, Serialize};
use validator::Validate;

/// Columns every uploaded dataset must carry in its header row
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "hostname",
    "ip",
    "location",
    "operating_system",
    "system_owner",
    "application_owner",
];

/// One row of an asset inventory
///
/// The two owner labels are only present in training data; at inference time
/// they are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub hostname: String,

    /// Dotted quad, possibly malformed or empty
    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub operating_system: String,

    #[serde(default)]
    pub system_owner: Option<String>,

    #[serde(default)]
    pub application_owner: Option<String>,
}

impl AssetRecord {
    /// Create an unlabeled record
    pub fn new(
        hostname: impl Into<String>,
        ip: impl Into<String>,
        location: impl Into<String>,
        operating_system: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            ip: ip.into(),
            location: location.into(),
            operating_system: operating_system.into(),
            system_owner: None,
            application_owner: None,
        }
    }

    pub fn with_owners(
        mut self,
        system_owner: impl Into<String>,
        application_owner: impl Into<String>,
    ) -> Self {
        self.system_owner = Some(system_owner.into());
        self.application_owner = Some(application_owner.into());
        self
    }

    /// Whether both owner labels are present
    pub fn is_labeled(&self) -> bool {
        self.system_owner.is_some() && self.application_owner.is_some()
    }
}

/// Inference input submitted through the form or the JSON API
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PredictionRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub hostname: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub ip: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub location: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub operating_system: String,
}

impl From<PredictionRequest> for AssetRecord {
    fn from(request: PredictionRequest) -> Self {
        AssetRecord::new(
            request.hostname,
            request.ip,
            request.location,
            request.operating_system,
        )
    }
}

/// Predicted owners for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPrediction {
    pub system_owner: String,
    pub application_owner: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_request_defaults_to_empty_fields() {
        let request: PredictionRequest = serde_json::from_str(r#"{"hostname":"web-01"}"#).unwrap();
        let record = AssetRecord::from(request);

        assert_eq!(record.hostname, "web-01");
        assert_eq!(record.ip, "");
        assert_eq!(record.location, "");
        assert!(!record.is_labeled());
    }

    #[test]
    fn test_prediction_request_rejects_oversized_hostname() {
        let request = PredictionRequest {
            hostname: "h".repeat(300),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_with_owners_labels_record() {
        let record = AssetRecord::new("db-01", "10.0.0.5", "NYC", "Linux").with_owners("Ops", "Billing");
        assert!(record.is_labeled());
        assert_eq!(record.system_owner.as_deref(), Some("Ops"));
    }
}
