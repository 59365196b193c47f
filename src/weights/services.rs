use crate::config::SatisfactionBounds;
use crate::error::ApiError;
use crate::weights::dto::NewEntryRequest;

/// Both fields must be present. Values are otherwise unrestricted
/// unless bounds were configured.
pub(crate) fn validate_entry(
    bounds: &SatisfactionBounds,
    payload: &NewEntryRequest,
) -> Result<(i32, i32), ApiError> {
    let (weight, satisfaction) = match (payload.weight, payload.satisfaction) {
        (Some(w), Some(s)) => (w, s),
        _ => return Err(ApiError::MissingField),
    };
    if !bounds.contains(satisfaction) {
        return Err(ApiError::OutOfRange);
    }
    Ok((weight, satisfaction))
}
