mod common;

use common::{png_bytes, unique_temp_dir};
use digital_lurker::dtos::form::UploadFilePayload;
use digital_lurker::services::MediaStorage;

fn upload(file_name: &str, bytes: Vec<u8>) -> UploadFilePayload {
    UploadFilePayload {
        file_name: file_name.to_string(),
        content_type: None,
        bytes,
    }
}

#[tokio::test]
async fn save_names_the_file_after_the_sniffed_format() {
    let root = unique_temp_dir("media_sniff");
    let media = MediaStorage::new(&root, "/media");

    for name in ["blob", "me.txt", "../../escape.PNG"] {
        let stored = media.save("users", &upload(name, png_bytes(3, 3))).await.unwrap();
        assert!(stored.starts_with("users/"), "{name}: {stored}");
        assert!(stored.ends_with(".png"), "{name}: {stored}");
        assert!(media.absolute_path(&stored).starts_with(&root));
        assert!(media.absolute_path(&stored).exists());
    }
}

#[tokio::test]
async fn save_falls_back_to_the_client_extension_for_unknown_bytes() {
    let root = unique_temp_dir("media_fallback");
    let media = MediaStorage::new(&root, "/media/");

    let stored = media
        .save("misc", &upload("notes.TXT", b"plain words".to_vec()))
        .await
        .unwrap();
    assert!(stored.ends_with(".txt"), "{stored}");

    let stored = media
        .save("misc", &upload("noext", b"plain words".to_vec()))
        .await
        .unwrap();
    assert!(!stored.contains('.'), "{stored}");
    assert_eq!(media.url(&stored), format!("/media/{stored}"));
}

#[tokio::test]
async fn discard_removes_a_stored_upload() {
    let root = unique_temp_dir("media_discard");
    let media = MediaStorage::new(&root, "/media/");
    let stored = media.save("places", &upload("a.png", png_bytes(2, 2))).await.unwrap();

    media.discard(&stored).await;
    assert!(!media.absolute_path(&stored).exists());

    // A second discard only logs.
    media.discard(&stored).await;
}
