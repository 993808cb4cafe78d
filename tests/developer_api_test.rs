mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use common::{
    create_skill, multipart_request, send, send_json, setup_app, unique_email, unique_id,
};

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn developer_crud_round_trip() {
    let (app, _state) = setup_app().await;
    let id = unique_id();
    let email = unique_email("ada");

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({
            "id": id,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": email,
            "about": "Analyst",
            "skill_ids": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["id"], json!(id));
    assert_eq!(created["skills"], json!([]));
    assert!(created.get("skill_ids").is_none());

    let (status, fetched) = send_json(&app, "GET", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send_json(&app, "GET", "/api/developers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed
        .as_array()
        .expect("array")
        .iter()
        .any(|d| d["id"] == json!(id)));

    let (status, patched) = send_json(
        &app,
        "PATCH",
        &format!("/api/developers/{}/", id),
        Some(json!({ "about": "First programmer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", patched);
    assert_eq!(patched["about"], json!("First programmer"));
    assert_eq!(patched["first_name"], json!("Ada"));

    let (status, _) = send_json(&app, "DELETE", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(&app, "GET", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn duplicate_email_is_a_conflict_and_persists_nothing() {
    let (app, state) = setup_app().await;
    let email = unique_email("dup");
    let first = unique_id();
    let second = unique_id();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({ "id": first, "first_name": "A", "last_name": "B", "email": email, "skill_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({ "id": second, "first_name": "C", "last_name": "D", "email": email, "skill_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM developers WHERE id = $1)")
        .bind(second)
        .fetch_one(&state.pool)
        .await
        .unwrap();
    assert!(!exists);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({ "id": first, "first_name": "E", "last_name": "F", "email": unique_email("other"), "skill_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn duplicate_skill_ids_collapse_to_a_set() {
    let (app, _state) = setup_app().await;
    let rust = create_skill(&app, "Rust").await;
    let sql = create_skill(&app, "SQL").await;
    let id = unique_id();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({
            "id": id,
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": unique_email("grace"),
            "skill_ids": [rust, rust, sql],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (_, fetched) = send_json(&app, "GET", &format!("/api/developers/{}", id), None).await;
    let mut ids: Vec<i64> = fetched["skills"]
        .as_array()
        .expect("skills")
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    let mut expected = vec![rust, sql];
    expected.sort();
    assert_eq!(ids, expected);

    let (status, replaced) = send_json(
        &app,
        "PATCH",
        &format!("/api/developers/{}/", id),
        Some(json!({ "skill_ids": [sql] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["skills"], json!([{ "id": sql, "name": "SQL" }]));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn unknown_skill_id_is_a_field_error() {
    let (app, _state) = setup_app().await;
    let id = unique_id();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({
            "id": id,
            "first_name": "No",
            "last_name": "Skills",
            "email": unique_email("noskill"),
            "skill_ids": [i64::MAX],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["skill_ids"].is_array(), "{}", body);

    let (status, _) = send_json(&app, "GET", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn deleting_a_skill_unlinks_it_from_developers() {
    let (app, _state) = setup_app().await;
    let kept = create_skill(&app, "Go").await;
    let doomed = create_skill(&app, "Perl").await;
    let id = unique_id();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({
            "id": id,
            "first_name": "Rob",
            "last_name": "Pike",
            "email": unique_email("rob"),
            "skill_ids": [kept, doomed],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_json(&app, "DELETE", &format!("/api/skills/{}/", doomed), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, developer) = send_json(&app, "GET", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(developer["skills"], json!([{ "id": kept, "name": "Go" }]));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn full_update_requires_core_fields() {
    let (app, _state) = setup_app().await;
    let id = unique_id();
    let email = unique_email("put");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({ "id": id, "first_name": "Ken", "last_name": "T", "email": email, "about": "Unix", "skill_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/developers/{}/", id),
        Some(json!({ "first_name": "Ken" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["last_name"].is_array());
    assert!(body["fields"]["email"].is_array());
    assert!(body["fields"]["skill_ids"].is_array());

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/developers/{}/", id),
        Some(json!({ "first_name": "Kenneth", "last_name": "Thompson", "email": email, "skill_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["first_name"], json!("Kenneth"));
    assert_eq!(body["about"], json!("Unix"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn multipart_upload_stores_resume_reference() {
    let (app, state) = setup_app().await;
    let id = unique_id();
    let boundary = "DEVPROFILEBOUNDARY";

    let mut body = String::new();
    for (name, value) in [
        ("id", id.to_string()),
        ("first_name", "Margaret".to_string()),
        ("last_name", "Hamilton".to_string()),
        ("email", unique_email("margaret")),
    ] {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!(
        "--{}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"apollo.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4 guidance\r\n--{}--\r\n",
        boundary, boundary
    ));

    let req = Request::builder()
        .method("POST")
        .uri("/api/developers/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, created) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);

    let url = created["resume"].as_str().expect("resume url");
    assert!(url.starts_with("/media/resumes/"));
    assert!(url.ends_with(".pdf"));

    let relative = url.trim_start_matches("/media/");
    let stored = tokio::fs::read(state.media.root().join(relative))
        .await
        .expect("stored file");
    assert_eq!(stored, b"%PDF-1.4 guidance");

    let (status, cleared) = send_json(
        &app,
        "PATCH",
        &format!("/api/developers/{}/", id),
        Some(json!({ "resume": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["resume"], json!(null));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn rejected_image_leaves_no_files_behind() {
    let (app, state) = setup_app().await;
    let id = unique_id();

    let req = multipart_request(
        "POST",
        "/api/developers/",
        &[
            ("id", id.to_string()),
            ("first_name", "Bad".to_string()),
            ("last_name", "Photo".to_string()),
            ("email", unique_email("badphoto")),
        ],
        &[
            ("resume", "cv.pdf", "%PDF-1.4"),
            ("profile_photo", "me.png", "notapng"),
        ],
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["profile_photo"].is_array(), "{}", body);

    let (status, _) = send_json(&app, "GET", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!state.media.root().join("resumes").exists());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn non_numeric_ids_are_not_found() {
    let (app, _state) = setup_app().await;

    for uri in ["/api/developers/abc/", "/api/developers/abc", "/api/skills/1.5/"] {
        let (status, body) = send_json(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }

    let (status, _) = send_json(
        &app,
        "PATCH",
        "/api/developers/abc/",
        Some(json!({ "about": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn skill_ids_are_required_on_full_writes() {
    let (app, _state) = setup_app().await;
    let skill = create_skill(&app, "Fortran").await;
    let id = unique_id();
    let email = unique_email("fortran");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({ "id": id, "first_name": "John", "last_name": "Backus", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["skill_ids"].is_array(), "{}", body);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({
            "id": id,
            "first_name": "John",
            "last_name": "Backus",
            "email": email,
            "skill_ids": [skill],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/developers/{}/", id),
        Some(json!({ "first_name": "John", "last_name": "Backus", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["skill_ids"].is_array(), "{}", body);

    let (_, unchanged) = send_json(&app, "GET", &format!("/api/developers/{}/", id), None).await;
    assert_eq!(unchanged["skills"], json!([{ "id": skill, "name": "Fortran" }]));

    // A form body has no way to send an empty list.
    let req = multipart_request(
        "PUT",
        &format!("/api/developers/{}/", id),
        &[
            ("first_name", "John".to_string()),
            ("last_name", "Backus".to_string()),
            ("email", email.clone()),
        ],
        &[],
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["skills"], json!([]));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn explicit_null_is_a_field_error() {
    let (app, _state) = setup_app().await;
    let id = unique_id();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/developers/",
        Some(json!({
            "id": id,
            "first_name": "Null",
            "last_name": "Check",
            "email": unique_email("null"),
            "skill_ids": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/developers/{}/", id),
        Some(json!({ "first_name": null, "skill_ids": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["first_name"],
        json!(["This field may not be null."])
    );
    assert!(body["fields"]["skill_ids"].is_array());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database at DATABASE_URL"]
async fn updating_to_a_taken_email_is_a_conflict() {
    let (app, _state) = setup_app().await;
    let taken = unique_email("owner");
    let own = unique_email("other");
    let owner = unique_id();
    let other = unique_id();

    for (id, email) in [(owner, &taken), (other, &own)] {
        let (status, body) = send_json(
            &app,
            "POST",
            "/api/developers/",
            Some(json!({
                "id": id,
                "first_name": "Dev",
                "last_name": "Eloper",
                "email": email,
                "skill_ids": [],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/developers/{}/", other),
        Some(json!({ "email": taken, "first_name": "Changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("developer with this email already exists."));

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/developers/{}/", other),
        Some(json!({
            "first_name": "Changed",
            "last_name": "Eloper",
            "email": taken,
            "skill_ids": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (_, unchanged) = send_json(&app, "GET", &format!("/api/developers/{}/", other), None).await;
    assert_eq!(unchanged["email"], json!(own));
    assert_eq!(unchanged["first_name"], json!("Dev"));

    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/api/developers/{}/", other),
        Some(json!({ "email": own })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
