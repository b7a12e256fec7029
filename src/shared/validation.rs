use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

lazy_static! {
    /// Paths served as static assets, matched on the file extension
    /// - Matches: "/logo.png", "/fonts/inter.woff2", "/app.js"
    /// - Does not match: "/reports", "/admin/js", "/file.json"
    pub static ref STATIC_ASSET_REGEX: Regex =
        Regex::new(r"\.(?:jpe?g|png|gif|webp|svg|ico|css|js|woff2?|ttf)$").unwrap();

    /// Object key segment that must not escape its prefix
    pub static ref OBJECT_KEY_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/_.-]*$").unwrap();
}

/// Rejects empty and whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// True when `value` has at least `min` characters once surrounding whitespace is trimmed
pub fn has_min_chars(value: &str, min: usize) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= min
}

/// Flatten validator errors into their messages.
///
/// Fields listed in `order` come first, in that order; the rest follow by name.
/// Nested structs are flattened in place using the same ordering.
pub fn error_messages(errors: &ValidationErrors, order: &[&str]) -> Vec<String> {
    let rank = |field: &str| {
        order
            .iter()
            .position(|f| *f == field)
            .unwrap_or(order.len())
    };

    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|(a, _), (b, _)| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));

    entries
        .into_iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
                .collect::<Vec<_>>(),
            ValidationErrorsKind::Struct(nested) => error_messages(nested, order),
            ValidationErrorsKind::List(items) => items
                .values()
                .flat_map(|nested| error_messages(nested, order))
                .collect(),
        })
        .collect()
}
