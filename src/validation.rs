use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Reject IDs that are empty or could escape the per-project directory.
pub fn require_safe_id(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must be a valid ID")));
    }
    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(AppError::Validation(format!(
            "{field} contains illegal path characters"
        )));
    }
    Ok(())
}
