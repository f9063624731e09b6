use serde_json::Value;
use std::collections::HashMap;

/// An uploaded file taken from a multipart body.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadFilePayload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Request body normalized from either JSON or `multipart/form-data`.
/// Multipart text parts are stored as JSON strings.
#[derive(Clone, Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Value>,
    files: HashMap<String, UploadFilePayload>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                fields: map.into_iter().collect(),
                files: HashMap::new(),
            }),
            _ => None,
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert_field(name, value.into());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadFilePayload) -> Self {
        self.insert_file(name, file);
        self
    }

    pub fn insert_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn insert_file(&mut self, name: &str, file: UploadFilePayload) {
        self.files.insert(name.to_string(), file);
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn file(&self, name: &str) -> Option<&UploadFilePayload> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.files.contains_key(name)
    }

    /// String view of a scalar field; numbers and booleans are stringified.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}
