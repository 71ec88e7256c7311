//! Field validators shared by the request DTOs.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::{Uuid, Version};
use validator::ValidationError;

/// Student ids are UUID v4 strings.
pub fn is_uuid_v4(value: &str) -> bool {
    Uuid::parse_str(value)
        .map(|id| id.get_version() == Some(Version::Random))
        .unwrap_or(false)
}

/// RGA registration codes look like `2019.1907.001-2`. ASCII digits only.
pub static RGA_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}\.[0-9]{4}\.[0-9]{3}-[0-9]$").expect("RGA pattern compiles")
});

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be empty"));
        Err(err)
    } else {
        Ok(())
    }
}
