use crate::utils::error::{Result, TallyError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "At least one entry is required".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TallyError::InvalidConfigValueError {
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
    if value < min || value > max {
        return Err(TallyError::InvalidConfigValueError {
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
    fn test_validate_path() {
        assert!(validate_path("input.base_dir", "..").is_ok());
        assert!(validate_path("input.base_dir", "").is_err());
        assert!(validate_path("input.base_dir", "a\0b").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("output.top", 5, 1).is_ok());
        assert!(validate_positive_number("output.top", 0, 1).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("output.formats", "csv", &["json", "csv"]).is_ok());
        assert!(validate_one_of("output.formats", "zip", &["json", "csv"]).is_err());
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty_list::<String>("input.files", &[]).is_err());
        assert!(validate_non_empty_list("input.files", &["a.json"]).is_ok());
        assert!(validate_non_empty_string("keywords.terms", "  ").is_err());
        assert!(validate_non_empty_string("keywords.terms", "remote").is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("input.months", 1, 1, 12).is_ok());
        assert!(validate_range("input.months", 12, 1, 12).is_ok());
        assert!(validate_range("input.months", 13, 1, 12).is_err());
        assert!(validate_range("input.months", 0, 1, 12).is_err());
    }
}
