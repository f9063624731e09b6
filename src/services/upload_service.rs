use anyhow::{Result, anyhow};
use bytes::Bytes;
use futures_util::stream;
use serde_json::Value;

use crate::dtos::form::{FormData, UploadFilePayload};

/// Turns raw request bodies into [`FormData`].
#[derive(Clone, Default)]
pub struct UploadService;

impl UploadService {
    pub fn new() -> Self {
        Self
    }

    /// Dispatches on the content type: multipart, JSON, or an empty form for
    /// an empty body.
    pub async fn parse_body(&self, content_type: Option<&str>, body: Bytes) -> Result<FormData> {
        let content_type = content_type.unwrap_or_default();
        if content_type.starts_with("multipart/form-data") {
            return self.parse_multipart(content_type, body).await;
        }
        if body.iter().all(|byte| byte.is_ascii_whitespace()) {
            return Ok(FormData::new());
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| anyhow!("JSON parse error - {}", e))?;
        FormData::from_json(value).ok_or_else(|| anyhow!("Expected a JSON object"))
    }

    pub async fn parse_multipart(&self, content_type: &str, body: Bytes) -> Result<FormData> {
        let boundary = multer::parse_boundary(content_type)?;
        let body_stream = stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(body_stream, boundary);

        let mut form = FormData::new();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            match field.file_name().map(ToString::to_string) {
                Some(incoming_name) => {
                    let content_type = field.content_type().map(|value| value.to_string());
                    let bytes = field.bytes().await?.to_vec();
                    if bytes.is_empty() {
                        continue;
                    }
                    form.insert_file(
                        &name,
                        UploadFilePayload {
                            file_name: incoming_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.insert_field(&name, Value::String(text));
                }
            }
        }

        Ok(form)
    }
}
