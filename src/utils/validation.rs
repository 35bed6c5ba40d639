use crate::utils::error::{CutListError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Rejects NaN as well as values below `min_value`.
pub fn validate_min(field_name: &str, value: f64, min_value: f64) -> Result<()> {
    if !value.is_finite() || value < min_value {
        return Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written as a negated conjunction so NaN floats are rejected too
    if !(value >= min && value <= max) {
        return Err(CutListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_min() {
        assert!(validate_min("thickness", 15.0, 0.1).is_ok());
        assert!(validate_min("thickness", 0.0, 0.1).is_err());
        assert!(validate_min("thickness", f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("costs.waste_percent", 15.0, 0.0, 50.0).is_ok());
        assert!(validate_range("costs.waste_percent", 51.0, 0.0, 50.0).is_err());
        assert!(validate_range("cutting.optimization_priority", 101u8, 0, 100).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("import", "estante.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("import", "ESTANTE.CSV", &["csv"]).is_ok());
        assert!(validate_file_extension("import", "estante.skp", &["csv"]).is_err());
        assert!(validate_file_extension("import", "estante", &["csv"]).is_err());
    }
}
