mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, multipart_body, png_bytes, request};
use digital_lurker::entities::GeoPoint;
use digital_lurker::services::GeoDistanceService;

#[tokio::test]
async fn retrieve_place_reports_zero_distance_without_point_header() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Old Town", (21.0122, 52.2297), 40, true).await;

    let (status, body) = app
        .send(request("GET", &format!("/places/{}/", place.public_id)).empty())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distance"], 0);
    assert_eq!(body["name"], "Old Town");
    assert_eq!(body["location"], "SRID=4326;POINT (21.0122 52.2297)");
    assert_eq!(body["main_image"], "/media/defaults/places/default.png");
}

#[tokio::test]
async fn retrieve_place_reports_floored_geodesic_distance() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Equator", (0.0, 0.0), 10, true).await;

    let (status, body) = app
        .send(
            request("GET", &format!("/places/{}/", place.public_id))
                .point("POINT(0 1)")
                .empty(),
        )
        .await;

    let expected = GeoDistanceService::meters(
        GeoPoint::new(0.0, 0.0).unwrap(),
        GeoPoint::new(0.0, 1.0).unwrap(),
    )
    .floor() as i64;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distance"], expected);
    assert!((110_000..111_000).contains(&expected));
}

#[tokio::test]
async fn retrieve_place_rejects_malformed_point_header() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Somewhere", (1.0, 1.0), 5, true).await;

    let (status, body) = app
        .send(
            request("GET", &format!("/places/{}/", place.public_id))
                .point("here please")
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(["Wrong localization format. Use POINT(x y). "]));
}

#[tokio::test]
async fn retrieve_place_returns_not_found_for_unknown_or_malformed_ids() {
    let app = TestApp::new();

    let (status, body) = app
        .send(request("GET", &format!("/places/{}/", uuid::Uuid::new_v4())).empty())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Not found." }));

    let (status, _) = app.send(request("GET", "/places/not-a-uuid/").empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_place_requires_authentication() {
    let app = TestApp::new();

    let (status, body) = app
        .send(request("POST", "/places/").json(json!({
            "name": "Bridge",
            "location": "POINT(1 2)",
            "experience": 10
        })))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "detail": "Authentication credentials were not provided." })
    );
    assert_eq!(app.store.place_count(), 0);
}

#[tokio::test]
async fn create_place_by_non_admin_is_forbidden_and_writes_nothing() {
    let app = TestApp::new();
    let user = app.create_user("walker", false).await;

    let (status, body) = app
        .send(request("POST", "/places/").token(&app.token_for(&user)).json(json!({
            "name": "Bridge",
            "location": "POINT(1 2)",
            "experience": 10
        })))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({ "detail": "You do not have permission to perform this action." })
    );
    assert_eq!(app.store.place_count(), 0);
}

#[tokio::test]
async fn create_place_by_admin_binds_creator_and_defaults() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;

    let (status, body) = app
        .send(request("POST", "/places/").token(&app.token_for(&admin)).json(json!({
            "name": "Palace of Culture",
            "description": "Tall",
            "location": "SRID=4326;POINT(21.0067 52.2319)",
            "experience": 50
        })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Palace of Culture");
    assert_eq!(body["description"], "Tall");
    assert_eq!(body["experience"], 50);
    assert_eq!(body["is_active"], true);
    assert_eq!(body["distance"], 0);
    assert_eq!(app.store.place_count(), 1);

    let public_id = body["public_id"].as_str().unwrap().parse().unwrap();
    let place = app.state.places.get(public_id).await.unwrap();
    assert_eq!(place.added_by, admin.id);
}

#[tokio::test]
async fn create_place_accepts_multipart_with_main_image() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let image = png_bytes(8, 8);
    let body = multipart_body(
        &[
            ("name", "Gallery"),
            ("location", "POINT(10 20)"),
            ("experience", "15"),
            ("is_active", "false"),
        ],
        &[("main_image", "front.png", &image)],
    );

    let (status, body) = app
        .send(request("POST", "/places/").token(&app.token_for(&admin)).multipart(body))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_active"], false);
    let url = body["main_image"].as_str().unwrap();
    assert!(url.starts_with("/media/places/"), "unexpected url {url}");
    assert!(url.ends_with(".png"));
    let stored = app.media_root.join(url.trim_start_matches("/media/"));
    assert!(stored.exists(), "main image not stored at {}", stored.display());
}

#[tokio::test]
async fn create_place_reports_field_errors() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;

    let (status, body) = app
        .send(request("POST", "/places/").token(&app.token_for(&admin)).json(json!({
            "location": "POINT(500 2)",
            "experience": "lots"
        })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["This field is required."]));
    assert_eq!(body["experience"], json!(["A valid integer is required."]));
    assert!(body["location"].is_array());
    assert_eq!(app.store.place_count(), 0);
}

#[tokio::test]
async fn partial_update_keeps_fields_not_sent() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Mill", (3.0, 4.0), 30, true).await;

    let (status, body) = app
        .send(
            request("PATCH", &format!("/places/{}/", place.public_id))
                .token(&app.token_for(&admin))
                .json(json!({ "name": "Old Mill" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Old Mill");
    assert_eq!(body["experience"], 30);
    assert_eq!(body["location"], "SRID=4326;POINT (3 4)");
}

#[tokio::test]
async fn partial_update_of_location_renders_ewkt() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Test Place", (1.234, 5.678), 40, true).await;

    let (status, body) = app
        .send(
            request("PATCH", &format!("/places/{}/", place.public_id))
                .token(&app.token_for(&admin))
                .json(json!({ "name": "Test Update Place", "location": "POINT(9 7)" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test Update Place");
    assert_eq!(body["location"], "SRID=4326;POINT (9 7)");
    assert_eq!(body["experience"], 40);
}

#[tokio::test]
async fn full_update_requires_every_required_field() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let place = app.create_place(&admin, "Mill", (3.0, 4.0), 30, true).await;
    let uri = format!("/places/{}/", place.public_id);

    let (status, body) = app
        .send(
            request("PUT", &uri)
                .token(&app.token_for(&admin))
                .json(json!({ "name": "Old Mill" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["location"], json!(["This field is required."]));
    assert_eq!(body["experience"], json!(["This field is required."]));

    let (status, body) = app
        .send(request("PUT", &uri).token(&app.token_for(&admin)).json(json!({
            "name": "Old Mill",
            "location": { "type": "Point", "coordinates": [5.0, 6.0] },
            "experience": 31,
            "is_active": false
        })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["experience"], 31);
    assert_eq!(body["is_active"], false);
    assert_eq!(body["location"], "SRID=4326;POINT (5 6)");
}

#[tokio::test]
async fn update_place_by_non_admin_is_forbidden() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    let user = app.create_user("walker", false).await;
    let place = app.create_place(&admin, "Mill", (3.0, 4.0), 30, true).await;

    let (status, _) = app
        .send(
            request("PATCH", &format!("/places/{}/", place.public_id))
                .token(&app.token_for(&user))
                .json(json!({ "experience": 1 })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let stored = app.state.places.get(place.public_id).await.unwrap();
    assert_eq!(stored.experience, 30);
}

#[tokio::test]
async fn delete_place_by_other_admin_is_unauthorized() {
    let app = TestApp::new();
    let creator = app.create_user("creator", true).await;
    let other = app.create_user("other", true).await;
    let place = app.create_place(&creator, "Mill", (3.0, 4.0), 30, true).await;

    let (status, body) = app
        .send(
            request("DELETE", &format!("/places/{}/", place.public_id))
                .token(&app.token_for(&other))
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_null());
    assert_eq!(app.store.place_count(), 1);
}

#[tokio::test]
async fn delete_place_by_creator_cascades_photos_and_likes() {
    let app = TestApp::new();
    let creator = app.create_user("creator", true).await;
    let walker = app.create_user("walker", false).await;
    let place = app.create_place(&creator, "Mill", (3.0, 4.0), 30, true).await;
    let photo = app.create_photo(&walker, &place, "Wheel").await;
    app.create_like(&creator, &photo).await;

    let (status, body) = app
        .send(
            request("DELETE", &format!("/places/{}/", place.public_id))
                .token(&app.token_for(&creator))
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(app.store.place_count(), 0);
    assert_eq!(app.store.photo_count(), 0);
    assert_eq!(app.store.like_count(), 0);
}

#[tokio::test]
async fn search_requires_admin() {
    let app = TestApp::new();
    let user = app.create_user("walker", false).await;

    let (status, _) = app
        .send(request("GET", "/places/search/").token(&app.token_for(&user)).empty())
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn search_matches_name_case_insensitively() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    app.create_place(&admin, "Clock Tower", (1.0, 1.0), 10, true).await;
    app.create_place(&admin, "River Bank", (1.0, 1.0), 10, true).await;

    let (status, body) = app
        .send(
            request("GET", "/places/search/?search=tOWer")
                .token(&app.token_for(&admin))
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Clock Tower");
}

#[tokio::test]
async fn search_range_keeps_places_strictly_closer_than_radius() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;
    app.create_place(&admin, "Near", (0.0, 0.0), 10, true).await;
    app.create_place(&admin, "Far", (0.0, 1.0), 10, true).await;

    let (status, body) = app
        .send(
            request("GET", "/places/search/?range=50000")
                .token(&app.token_for(&admin))
                .point("POINT(0 0.1)")
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Near");
    let distance = body["results"][0]["distance"].as_i64().unwrap();
    assert!(distance > 0 && distance < 50_000);
}

#[tokio::test]
async fn search_range_without_point_header_is_rejected() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;

    let (status, body) = app
        .send(
            request("GET", "/places/search/?range=1000")
                .token(&app.token_for(&admin))
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Point header is missing." }));
}

#[tokio::test]
async fn search_range_must_be_numeric() {
    let app = TestApp::new();
    let admin = app.create_user("admin", true).await;

    let (status, body) = app
        .send(
            request("GET", "/places/search/?range=far")
                .token(&app.token_for(&admin))
                .point("POINT(0 0)")
                .empty(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "range": ["A valid number is required."] }));
}

#[tokio::test]
async fn search_paginates_in_creation_order() {
    let app = TestApp::with(|config| config.set("pagination.page_size", "2"));
    let admin = app.create_user("admin", true).await;
    for name in ["Place One", "Place Two", "Place Three"] {
        app.create_place(&admin, name, (1.0, 1.0), 10, true).await;
    }
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(request("GET", "/places/search/").token(&token).empty())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["next"], "?page=2");
    assert!(body["previous"].is_null());
    assert_eq!(body["results"][0]["name"], "Place One");
    assert_eq!(body["results"][1]["name"], "Place Two");

    let (status, body) = app
        .send(
            request("GET", "/places/search/?search=place&page=2")
                .token(&token)
                .empty(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["name"], "Place Three");
    assert!(body["next"].is_null());
    assert_eq!(body["previous"], "?search=place&page=1");

    let (status, body) = app
        .send(request("GET", "/places/search/?page=7").token(&token).empty())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Invalid page." }));
}
