use crate::domain::model::{ProjectRecord, TrackingMode};
use crate::utils::error::{Result, ShipsGoError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// ShipsGo container format
static CONTAINER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}[0-9]{7}$").expect("valid container regex"));

// ShipsGo booking format
static BOOKING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9/-]+$").expect("valid booking regex"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Save-time hook for a project's tracking fields.
///
/// Runs only when "Track With" is set. Unrecognised modes are accepted as-is.
pub fn validate_shipment_tracking(
    track_with: Option<&TrackingMode>,
    tracking_number: Option<&str>,
) -> Result<()> {
    let Some(mode) = track_with else {
        return Ok(());
    };
    let number = tracking_number.unwrap_or_default();

    match mode {
        TrackingMode::ContainerNumber => validate_container_number(number),
        TrackingMode::BookingNumber => validate_booking_number(number),
        TrackingMode::Other(value) => {
            tracing::debug!("Skipping tracking number validation for mode '{}'", value);
            Ok(())
        }
    }
}

pub fn validate_container_number(number: &str) -> Result<()> {
    if number.is_empty() {
        return Err(ShipsGoError::ValidationError {
            message: "Container Number is required when Track With is 'Container Number'."
                .to_string(),
        });
    }

    if !CONTAINER_NUMBER.is_match(number) {
        return Err(ShipsGoError::ValidationError {
            message: "Invalid Container Number format. Expected format: 4 uppercase letters \
                      followed by 7 digits (Example: ABCD1234567)"
                .to_string(),
        });
    }

    Ok(())
}

pub fn validate_booking_number(number: &str) -> Result<()> {
    if number.is_empty() {
        return Err(ShipsGoError::ValidationError {
            message: "Booking Number is required when Track With is 'Booking Number'."
                .to_string(),
        });
    }

    if !BOOKING_NUMBER.is_match(number) {
        return Err(ShipsGoError::ValidationError {
            message: "Invalid Booking Number format. Only letters, numbers, / and - are allowed."
                .to_string(),
        });
    }

    Ok(())
}

impl Validate for ProjectRecord {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_shipment_tracking(self.track_with.as_ref(), self.tracking_number.as_deref())
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ShipsGoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShipsGoError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ShipsGoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ShipsGoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShipsGoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
