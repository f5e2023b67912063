use crate::error::{AppError, Result};
use crate::ml::bundle::ModelBundle;
use crate::ml::models::Target;
use crate::models::{AssetRecord, OwnerPrediction};
use tracing::debug;

/// Predict both owners for a single record
///
/// The record is transformed with the bundle's fitted encoders and
/// vocabulary, aligned to the frozen schema, then run through both models.
pub fn predict(record: &AssetRecord, bundle: &ModelBundle) -> Result<OwnerPrediction> {
    let frame = bundle.features.transform(std::slice::from_ref(record))?;
    let aligned = frame.reindex(&bundle.schema);

    let decode = |target: Target| -> Result<String> {
        let codes = bundle.model(target).predict(&aligned)?;
        let code = codes.first().copied().ok_or_else(|| {
            AppError::Internal(format!("{} model returned no prediction", target))
        })?;

        bundle
            .features
            .target_encoder(target)
            .inverse_transform(code)
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "{} model produced code {} outside its label space",
                    target, code
                ))
            })
    };

    let prediction = OwnerPrediction {
        system_owner: decode(Target::SystemOwner)?,
        application_owner: decode(Target::ApplicationOwner)?,
    };

    debug!(
        hostname = %record.hostname,
        system_owner = %prediction.system_owner,
        application_owner = %prediction.application_owner,
        "Predicted owners"
    );

    Ok(prediction)
}
