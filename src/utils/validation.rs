use crate::domain::model::BetBounds;
use crate::utils::error::{KioskError, Result};
use rust_decimal::Decimal;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(KioskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(KioskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(KioskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_positive_amount(field_name: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(KioskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Amount must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// 上下限必須為正數且 minimum <= maximum，否則拒絕開啟 kiosk
pub fn validate_bet_bounds(field_name: &str, bounds: &BetBounds) -> Result<()> {
    validate_positive_amount(&format!("{}.minimum", field_name), bounds.minimum)?;
    validate_positive_amount(&format!("{}.maximum", field_name), bounds.maximum)?;

    if bounds.minimum > bounds.maximum {
        return Err(KioskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", bounds.minimum, bounds.maximum),
            reason: "Minimum cannot be greater than maximum".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| KioskError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KioskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
