//! Field checks shared by the resource services. Failures are 422s.

use sea_orm::ActiveValue;

use crate::error::AppError;

pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::unprocessable(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trims the value; blank strings become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Canonical form emails are stored and looked up in.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

pub fn email(field: &str, value: &str) -> Result<String, AppError> {
    let normalized = normalize_email(value);
    let valid = match normalized.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !normalized.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::unprocessable(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(normalized)
}

pub fn optional_email(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    optional_text(value)
        .map(|raw| email(field, &raw))
        .transpose()
}

pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<String, AppError> {
    let normalized = value.trim().to_ascii_lowercase();
    if allowed.contains(&normalized.as_str()) {
        return Ok(normalized);
    }
    Err(AppError::unprocessable(format!(
        "{field} must be one of: {}",
        allowed.join(", ")
    )))
}

pub fn non_negative<T>(field: &str, value: T) -> Result<T, AppError>
where
    T: PartialOrd + Default + Copy,
{
    if value < T::default() {
        return Err(AppError::unprocessable(format!("{field} must not be negative")));
    }
    Ok(value)
}

pub fn optional_non_negative<T>(field: &str, value: Option<T>) -> Result<Option<T>, AppError>
where
    T: PartialOrd + Default + Copy,
{
    value.map(|value| non_negative(field, value)).transpose()
}

/// The value a caller supplied for a column, if any.
pub fn supplied<T>(value: &ActiveValue<T>) -> Option<&T>
where
    T: Into<sea_orm::Value>,
{
    match value {
        ActiveValue::Set(value) => Some(value),
        _ => None,
    }
}
