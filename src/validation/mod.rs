//! Input validation for admin-submitted records.
//!
//! Centralizes the field rules for journeys, phases and entries so that
//! every write payload is rejected before it reaches the document store.

/// Length limits for validated fields.
pub mod limits {
    /// Maximum title length for journeys, phases and entries.
    pub const MAX_TITLE_LENGTH: usize = 200;
    /// Maximum free-text description length.
    pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;
    /// Maximum focus area / tech stack label length (e.g., "Networking").
    pub const MAX_LABEL_LENGTH: usize = 64;
    /// Maximum number of focus areas on a single phase.
    pub const MAX_FOCUS_AREAS: usize = 32;
    /// Maximum number of tech stack labels on a single entry.
    pub const MAX_TECH_STACK: usize = 32;
    /// Maximum URL length for links and certificate images.
    pub const MAX_URL_LENGTH: usize = 2048;
}

/// Error constants for validation failures.
pub mod errmsg {
    pub const FIELD_EMPTY: &str = "field cannot be empty";
    pub const FIELD_TOO_LONG: &str = "field exceeds maximum length";
    pub const TOO_MANY_ITEMS: &str = "list exceeds maximum number of items";
    pub const DUPLICATE_LABEL: &str = "list contains a duplicate label";
    pub const INVALID_ENUM: &str = "value is not one of the allowed values";
    pub const ORDER_START: &str = "entry order starts at 1";
    pub const URL_SCHEME: &str = "link must be an http(s) URL";
    pub const ISSUER_REQUIRED: &str = "certification entries require an issuer";
    pub const UNKNOWN_FOCUS_AREA: &str = "entry domain is not a focus area of its phase";
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A write payload that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: {}", errmsg::FIELD_EMPTY)]
    Empty { field: &'static str },

    #[error("{field}: {} (max: {max}, got: {actual})", errmsg::FIELD_TOO_LONG)]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field}: {} (max: {max}, got: {actual})", errmsg::TOO_MANY_ITEMS)]
    TooManyItems {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field}: {} ({value:?})", errmsg::DUPLICATE_LABEL)]
    DuplicateLabel { field: &'static str, value: String },

    #[error("{field}: {} (got {value:?}, allowed: {})", errmsg::INVALID_ENUM, .allowed.join(", "))]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("order: {} (got {value})", errmsg::ORDER_START)]
    InvalidOrder { value: u32 },

    #[error("{field}: {} (got {value:?})", errmsg::URL_SCHEME)]
    InvalidUrl { field: &'static str, value: String },

    #[error("issuer: {}", errmsg::ISSUER_REQUIRED)]
    IssuerRequired,

    #[error("domain: {} (got {domain:?}, allowed: {allowed:?})", errmsg::UNKNOWN_FOCUS_AREA)]
    UnknownFocusArea {
        domain: String,
        allowed: Vec<String>,
    },
}

/// Validate a required single-line title.
///
/// Rules:
/// - Must not be empty or whitespace only
/// - Maximum 200 characters
pub fn validate_title(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    check_length(field, value, limits::MAX_TITLE_LENGTH)
}

/// Validate an optional free-text description.
pub fn validate_description(value: &str) -> Result<()> {
    check_length("description", value, limits::MAX_DESCRIPTION_LENGTH)
}

/// Validate a required identifier-like string (ids, back-references).
pub fn validate_required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Validate an ordered set of labels (focus areas, tech stack).
///
/// Rules:
/// - No empty labels
/// - Each label at most 64 characters
/// - No duplicates (labels are compared exactly)
/// - At most `max_items` labels
pub fn validate_labels(field: &'static str, labels: &[String], max_items: usize) -> Result<()> {
    if labels.len() > max_items {
        return Err(ValidationError::TooManyItems {
            field,
            max: max_items,
            actual: labels.len(),
        });
    }

    for (i, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(ValidationError::Empty { field });
        }
        check_length(field, label, limits::MAX_LABEL_LENGTH)?;
        if labels[..i].contains(label) {
            return Err(ValidationError::DuplicateLabel {
                field,
                value: label.clone(),
            });
        }
    }

    Ok(())
}

/// Validate an optional http(s) link.
pub fn validate_url(field: &'static str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    check_length(field, value, limits::MAX_URL_LENGTH)?;
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate a 1-based entry order.
pub fn validate_entry_order(order: u32) -> Result<()> {
    if order == 0 {
        return Err(ValidationError::InvalidOrder { value: order });
    }
    Ok(())
}

/// Parse an enumeration tag against its allowed wire values.
///
/// Enumerations in this crate implement `TryFrom<&str>` through this helper
/// so that admin forms cannot smuggle arbitrary strings into the store.
pub fn parse_enum<T: Copy>(
    field: &'static str,
    value: &str,
    variants: &[(&'static str, T)],
    allowed: &'static [&'static str],
) -> Result<T> {
    variants
        .iter()
        .find(|(tag, _)| *tag == value)
        .map(|(_, v)| *v)
        .ok_or_else(|| ValidationError::InvalidEnum {
            field,
            value: value.to_string(),
            allowed,
        })
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
