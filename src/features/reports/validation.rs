use std::borrow::Cow;

use uuid::Uuid;
use validator::{ValidateArgs, ValidationError};

use crate::core::error::AppError;
use crate::features::reports::dtos::{GeoLocationInput, SubmitReportDto};
use crate::features::reports::mapping::GeoPoint;
use crate::shared::constants::{MAX_REPORT_PHOTOS, MIN_DESCRIPTION_LENGTH, MIN_TITLE_LENGTH};
use crate::shared::validation::{error_messages, has_min_chars};

/// Report form fields in the order their messages are shown
const FORM_FIELDS: &[&str] = &[
    "title",
    "category_id",
    "description",
    "address",
    "geo_location",
    "latitude",
    "longitude",
    "images",
];

/// Fields of a submission that passed validation, in their typed form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedReport {
    pub category_id: Uuid,
    pub location: GeoPoint,
}

/// Check the report form, collecting one message per failing field.
///
/// `extra_photos` counts photos sent alongside the form that are not yet in `images`.
pub fn validate_report_form(
    dto: &SubmitReportDto,
    extra_photos: usize,
) -> Result<ValidatedReport, AppError> {
    dto.validate_with_args(&extra_photos)
        .map_err(|e| AppError::InvalidFields(error_messages(&e, FORM_FIELDS)))?;

    match (dto.category_id, parse_location(&dto.geo_location)) {
        (Some(category_id), Some(location)) => Ok(ValidatedReport {
            category_id,
            location,
        }),
        _ => Err(AppError::Validation("Invalid report form".to_string())),
    }
}

fn min_chars_error(field: &str, min: usize) -> ValidationError {
    ValidationError::new("length").with_message(Cow::Owned(format!(
        "{} must be at least {} characters",
        field, min
    )))
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if has_min_chars(title, MIN_TITLE_LENGTH) {
        return Ok(());
    }
    Err(min_chars_error("Title", MIN_TITLE_LENGTH))
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if has_min_chars(description, MIN_DESCRIPTION_LENGTH) {
        return Ok(());
    }
    Err(min_chars_error("Description", MIN_DESCRIPTION_LENGTH))
}

pub fn validate_latitude(raw: &str) -> Result<(), ValidationError> {
    parse_coordinate(raw, 90.0)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("range"))
}

pub fn validate_longitude(raw: &str) -> Result<(), ValidationError> {
    parse_coordinate(raw, 180.0)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("range"))
}

/// (0, 0) is where the map starts, so it means no location was picked
pub fn validate_location_chosen(input: &GeoLocationInput) -> Result<(), ValidationError> {
    match parse_location(input) {
        Some(point) if point.is_unset() => Err(ValidationError::new("location_unset")),
        _ => Ok(()),
    }
}

/// Photos already referenced plus the ones arriving with the form
pub fn validate_photo_count(images: &[String], extra: &usize) -> Result<(), ValidationError> {
    if images.len() + *extra <= MAX_REPORT_PHOTOS {
        return Ok(());
    }
    Err(
        ValidationError::new("photo_count").with_message(Cow::Owned(format!(
            "A report can have at most {} photos",
            MAX_REPORT_PHOTOS
        ))),
    )
}

fn parse_location(input: &GeoLocationInput) -> Option<GeoPoint> {
    Some(GeoPoint {
        latitude: parse_coordinate(&input.latitude, 90.0)?,
        longitude: parse_coordinate(&input.longitude, 180.0)?,
    })
}

fn parse_coordinate(raw: &str, bound: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= bound)
}
