use bytes::Bytes;
use digital_lurker::services::UploadService;
use serde_json::json;

fn multipart_content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

fn multipart_body(boundary: &str) -> Vec<u8> {
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nSunset\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"../../evil name.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nfile-a\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"empty\"; filename=\"none.png\"\r\nContent-Type: image/png\r\n\r\n\r\n--{boundary}--\r\n"
    );
    body.into_bytes()
}

#[tokio::test]
async fn parse_multipart_splits_text_fields_and_files() {
    let service = UploadService::new();
    let boundary = "boundary-123";

    let form = service
        .parse_body(
            Some(&multipart_content_type(boundary)),
            Bytes::from(multipart_body(boundary)),
        )
        .await
        .expect("failed to parse multipart body");

    assert_eq!(form.text("title").as_deref(), Some("Sunset"));
    let image = form.file("image").expect("image part missing");
    assert_eq!(image.file_name, "../../evil name.jpg");
    assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(image.bytes, b"file-a");
    assert!(form.file("empty").is_none(), "empty uploads are skipped");
}

#[tokio::test]
async fn parse_json_object_keeps_typed_values() {
    let service = UploadService::new();
    let body = json!({ "name": "Pier", "experience": 12, "is_active": false }).to_string();

    let form = service
        .parse_body(Some("application/json"), Bytes::from(body))
        .await
        .unwrap();

    assert_eq!(form.value("experience"), Some(&json!(12)));
    assert_eq!(form.value("is_active"), Some(&json!(false)));
    assert_eq!(form.text("name").as_deref(), Some("Pier"));
}

#[tokio::test]
async fn empty_body_is_an_empty_form() {
    let service = UploadService::new();

    let form = service.parse_body(None, Bytes::from_static(b"  \n")).await.unwrap();

    assert!(!form.contains("anything"));
}

#[tokio::test]
async fn malformed_or_non_object_json_is_rejected() {
    let service = UploadService::new();

    let error = service
        .parse_body(Some("application/json"), Bytes::from_static(b"{ nope"))
        .await
        .unwrap_err();
    assert!(error.to_string().starts_with("JSON parse error - "));

    let error = service
        .parse_body(Some("application/json"), Bytes::from_static(b"[1, 2]"))
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Expected a JSON object");
}
