use chrono::NaiveDate;
use serde_json::Value;

use crate::dtos::form::{FormData, UploadFilePayload};
use crate::entities::GeoPoint;
use crate::http_error::{FieldErrors, HttpResult};
use crate::services::ImageService;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_BOOLEAN: &str = "Must be a valid boolean.";
pub const INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const NO_FILE: &str = "No file was submitted.";
pub const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const INVALID_GEOMETRY: &str =
    "Invalid format: string or unicode input unrecognized as GeoJSON, WKT EWKT or HEXEWKB.";
pub const NOT_UNIQUE: &str = "This field must be unique.";

/// Pulls typed values out of a [`FormData`], collecting field errors as it
/// goes. In partial mode absent fields are skipped instead of reported.
pub struct FormValidator<'a> {
    form: &'a FormData,
    partial: bool,
    errors: FieldErrors,
}

impl<'a> FormValidator<'a> {
    pub fn new(form: &'a FormData, partial: bool) -> Self {
        Self {
            form,
            partial,
            errors: FieldErrors::new(),
        }
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.add(field, message);
    }

    pub fn finish(self) -> HttpResult<()> {
        self.errors.into_result()
    }

    fn missing(&mut self, field: &str, required: bool) {
        if required && !self.partial {
            self.errors.add(field, REQUIRED);
        }
    }

    pub fn string(&mut self, field: &str, max_length: usize, required: bool) -> Option<String> {
        let Some(raw) = self.form.value(field) else {
            self.missing(field, required);
            return None;
        };

        let text = match raw {
            Value::Null => {
                self.errors.add(field, NULL);
                return None;
            }
            Value::String(text) => text.trim().to_string(),
            Value::Number(number) => number.to_string(),
            _ => {
                self.errors.add(field, "Not a valid string.");
                return None;
            }
        };

        if required && text.is_empty() {
            self.errors.add(field, BLANK);
            return None;
        }
        if text.chars().count() > max_length {
            self.errors.add(
                field,
                &format!("Ensure this field has no more than {max_length} characters."),
            );
            return None;
        }
        Some(text)
    }

    /// `Some(None)` means the client explicitly sent null.
    pub fn nullable_string(&mut self, field: &str, max_length: usize) -> Option<Option<String>> {
        match self.form.value(field) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(_) => self.string(field, max_length, false).map(Some),
        }
    }

    pub fn integer(&mut self, field: &str, required: bool) -> Option<i32> {
        let Some(raw) = self.form.value(field) else {
            self.missing(field, required);
            return None;
        };

        let parsed = match raw {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed.and_then(|value| i32::try_from(value).ok()) {
            Some(value) => Some(value),
            None => {
                self.errors.add(field, INVALID_INTEGER);
                None
            }
        }
    }

    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let raw = self.form.value(field)?;
        let parsed = match raw {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, INVALID_BOOLEAN);
        }
        parsed
    }

    pub fn point(&mut self, field: &str, required: bool) -> Option<GeoPoint> {
        let Some(raw) = self.form.value(field) else {
            self.missing(field, required);
            return None;
        };

        let parsed = match raw {
            Value::String(text) => GeoPoint::parse(text).ok(),
            Value::Object(_) => GeoPoint::from_geojson(raw).ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, INVALID_GEOMETRY);
        }
        parsed
    }

    pub fn date(&mut self, field: &str, required: bool) -> Option<NaiveDate> {
        let Some(raw) = self.form.value(field) else {
            self.missing(field, required);
            return None;
        };

        let parsed = raw
            .as_str()
            .and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok());
        if parsed.is_none() {
            self.errors.add(field, INVALID_DATE);
        }
        parsed
    }

    pub fn email(&mut self, field: &str, required: bool) -> Option<String> {
        let email = self.string(field, 254, required)?;
        if !is_valid_email(&email) {
            self.errors.add(field, INVALID_EMAIL);
            return None;
        }
        Some(email)
    }

    pub fn image(
        &mut self,
        field: &str,
        required: bool,
        images: &ImageService,
    ) -> Option<&'a UploadFilePayload> {
        let form: &'a FormData = self.form;
        let Some(file) = form.file(field) else {
            if form.value(field).is_some() {
                self.errors.add(
                    field,
                    "The submitted data was not a file. Check the encoding type on the form.",
                );
            } else if required && !self.partial {
                self.errors.add(field, NO_FILE);
            }
            return None;
        };

        if !images.is_valid_image(&file.bytes) {
            self.errors.add(field, INVALID_IMAGE);
            return None;
        }
        Some(file)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
