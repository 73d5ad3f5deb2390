use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use invite_api::auth::{AppState, AppStateInner, ensure_admin};
use invite_db::Database;

fn app() -> (Router, AppState) {
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
        session_days: 7,
    });
    (invite_api::router(state.clone()), state)
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn admin_token(app: &Router, state: &AppState) -> String {
    ensure_admin(&state.db, "organizer", "correct horse").unwrap();
    let (status, body) = call(
        app,
        Method::POST,
        "/auth/admin/login",
        None,
        Some(json!({ "username": "organizer", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn guest_token(app: &Router, username: &str) -> String {
    let (status, body) = call(app, Method::POST, "/auth/login", None, Some(json!({ "username": username }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn unknown_guest_self_registers() {
    let (app, _) = app();

    let (status, body) = call(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "  Lan " }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Bạn chưa được mời tham dự");

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "Lan", "display_name": "  Nguyễn Lan ", "salutation": "Chị" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["participant"]["username"], "lan");
    assert_eq!(body["participant"]["display_name"], "Nguyễn Lan");
    assert_eq!(body["participant"]["invited_to_dinner"], false);

    let (status, _) = call(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "lan", "display_name": "Someone else" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let token = guest_token(&app, "LAN").await;
    let (status, me) = call(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["salutation"], "Chị");
    assert!(me["rsvp"].is_null());
}

#[tokio::test]
async fn protected_routes_need_the_right_token() {
    let (app, state) = app();

    let (status, _) = call(&app, Method::GET, "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, Method::GET, "/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = admin_token(&app, &state).await;
    call(&app, Method::POST, "/admin/participants", Some(&admin), Some(json!({ "username": "binh" }))).await;
    let guest = guest_token(&app, "binh").await;

    let (status, body) = call(&app, Method::GET, "/admin/dashboard", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (status, _) = call(
        &app,
        Method::POST,
        "/auth/admin/login",
        None,
        Some(json!({ "username": "organizer", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rsvp_answers_feed_the_dashboard() {
    let (app, state) = app();
    let admin = admin_token(&app, &state).await;

    for (username, dinner) in [("an", true), ("binh", false), ("chi", true), ("dung", false)] {
        let (status, body) = call(
            &app,
            Method::POST,
            "/admin/participants",
            Some(&admin),
            Some(json!({ "username": username, "display_name": username.to_uppercase(), "invited_to_dinner": dinner })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    let an = guest_token(&app, "an").await;
    let (status, rsvp) = call(&app, Method::POST, "/rsvp", Some(&an), Some(json!({ "will_attend": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rsvp["name"], "AN");
    assert_eq!(rsvp["email"], "an@guests.local");
    assert!(rsvp["will_attend_dinner"].is_null());

    // A later dinner answer keeps the ceremony answer.
    let (_, rsvp) = call(&app, Method::POST, "/rsvp", Some(&an), Some(json!({ "will_attend_dinner": true }))).await;
    assert_eq!(rsvp["will_attend"], true);
    assert_eq!(rsvp["will_attend_dinner"], true);

    let binh = guest_token(&app, "binh").await;
    // Not invited to dinner: the stored dinner answer must be ignored.
    call(
        &app,
        Method::POST,
        "/rsvp",
        Some(&binh),
        Some(json!({ "will_attend": false, "will_attend_dinner": true })),
    )
    .await;

    let chi = guest_token(&app, "chi").await;
    call(&app, Method::POST, "/rsvp", Some(&chi), Some(json!({ "will_attend": true, "phone": " 0901 " }))).await;

    let (status, my) = call(&app, Method::GET, "/rsvp/me", Some(&chi), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(my["phone"], "0901");

    let (status, dash) = call(&app, Method::GET, "/admin/dashboard", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let counts = &dash["counts"];
    assert_eq!(counts["total_participants"], 4);
    assert_eq!(counts["ceremony_yes"], 2);
    assert_eq!(counts["ceremony_no"], 1);
    assert_eq!(counts["ceremony_pending"], 1);
    assert_eq!(counts["total_responses"], 3);
    assert_eq!(counts["attendance_rate"], 67);
    assert_eq!(counts["dinner_yes"], 1);
    assert_eq!(counts["dinner_pending"], 1);
    assert_eq!(counts["dinner_not_invited"], 2);
    assert_eq!(counts["dinner_invitees"], 2);
    assert_eq!(dash["dinner_yes"][0]["username"], "an");
    assert_eq!(dash["recent_responses"].as_array().unwrap().len(), 3);

    // Organizers are not guests.
    let (status, _) = call(&app, Method::POST, "/rsvp", Some(&admin), Some(json!({ "will_attend": true }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, rsvps) = call(&app, Method::GET, "/admin/rsvps", Some(&admin), None).await;
    assert_eq!(rsvps.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn rsvp_name_carries_the_salutation() {
    let (app, state) = app();
    let admin = admin_token(&app, &state).await;
    call(
        &app,
        Method::POST,
        "/admin/participants",
        Some(&admin),
        Some(json!({ "username": "lan", "display_name": "Lan", "salutation": "Chị" })),
    )
    .await;

    let lan = guest_token(&app, "lan").await;
    let (status, rsvp) = call(&app, Method::POST, "/rsvp", Some(&lan), Some(json!({ "will_attend": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rsvp["name"], "Chị Lan");
}

#[tokio::test]
async fn organizer_manages_participants() {
    let (app, state) = app();
    let admin = admin_token(&app, &state).await;

    let (status, report) = call(
        &app,
        Method::POST,
        "/admin/participants/import",
        Some(&admin),
        Some(json!([
            { "username": "An", "display_name": "An Tran", "invited_to_dinner": true },
            { "username": "   " },
            { "username": "organizer" },
            { "username": "binh", "salutation": " Anh " }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["imported"], 2);
    let failed = report["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0]["row"], 2);
    assert_eq!(failed[1]["row"], 3);

    let (_, list) = call(&app, Method::GET, "/admin/participants", Some(&admin), None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    // Newest first.
    assert_eq!(list[0]["username"], "binh");
    assert_eq!(list[0]["display_name"], "binh");
    assert_eq!(list[0]["salutation"], "Anh");
    assert_eq!(list[1]["invited_to_dinner"], true);

    let (status, _) = call(&app, Method::DELETE, "/admin/participants", Some(&admin), Some(json!({ "ids": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = list[1]["id"].clone();
    let (status, body) = call(
        &app,
        Method::DELETE,
        "/admin/participants",
        Some(&admin),
        Some(json!({ "ids": [id.clone(), id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (status, _) = call(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "an" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wishes_and_reactions() {
    let (app, state) = app();
    let admin = admin_token(&app, &state).await;
    for (username, display_name) in [("alice", "Alice"), ("bob", "Bob")] {
        call(
            &app,
            Method::POST,
            "/admin/participants",
            Some(&admin),
            Some(json!({ "username": username, "display_name": display_name })),
        )
        .await;
    }
    let alice = guest_token(&app, "alice").await;
    let bob = guest_token(&app, "bob").await;

    let (status, _) = call(&app, Method::POST, "/wishes", Some(&alice), Some(json!({ "message": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, wish) = call(
        &app,
        Method::POST,
        "/wishes",
        Some(&alice),
        Some(json!({ "message": " Chúc mừng tốt nghiệp! " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(wish["message"], "Chúc mừng tốt nghiệp!");
    assert_eq!(wish["name"], "Alice");
    let wish_id = wish["id"].as_str().unwrap().to_string();
    let reactions_uri = format!("/wishes/{}/reactions", wish_id);

    let (status, _) = call(
        &app,
        Method::POST,
        &reactions_uri,
        None,
        Some(json!({ "sticker": "🍕", "session_id": "S9" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, view) = call(
        &app,
        Method::POST,
        &reactions_uri,
        Some(&alice),
        Some(json!({ "sticker": "❤️", "session_id": "S1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["total_reactions"], 1);
    assert_eq!(view["sentence"], "Bạn");

    let (status, _) = call(
        &app,
        Method::POST,
        &reactions_uri,
        Some(&alice),
        Some(json!({ "sticker": "❤️", "session_id": "S1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    call(
        &app,
        Method::POST,
        &reactions_uri,
        Some(&bob),
        Some(json!({ "sticker": "❤️", "session_id": "S2" })),
    )
    .await;
    call(
        &app,
        Method::POST,
        &reactions_uri,
        Some(&alice),
        Some(json!({ "sticker": "🎉", "session_id": "S1" })),
    )
    .await;
    // Anonymous guest with a blank name.
    call(
        &app,
        Method::POST,
        &reactions_uri,
        None,
        Some(json!({ "sticker": "🎉", "session_id": "anon", "reactor_name": "  " })),
    )
    .await;

    let (status, view) = call(
        &app,
        Method::GET,
        &format!("{}?session_id=S1", reactions_uri),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["total_reactions"], 4);
    assert_eq!(view["viewer_stickers"], json!(["❤️", "🎉"]));
    assert_eq!(view["stickers"][0]["sticker"], "❤️");
    assert_eq!(view["stickers"][0]["label"], "Yêu thích");
    assert_eq!(view["stickers"][0]["names"], json!(["Alice", "Bob"]));
    assert_eq!(view["stickers"][1]["names"], json!(["Alice", "Khách"]));
    assert_eq!(view["sentence"], "Bạn, Bob và 1 người khác");

    // The same browser session without a login is a different fingerprint.
    let (_, anon_view) = call(&app, Method::GET, &format!("{}?session_id=S1", reactions_uri), None, None).await;
    assert_eq!(anon_view["viewer_stickers"], json!([]));

    let (_, page) = call(&app, Method::GET, "/wishes?page=1&limit=5", None, None).await;
    assert_eq!(page["has_more"], false);
    assert_eq!(page["wishes"][0]["reactions"].as_array().unwrap().len(), 4);

    let (status, _) = call(&app, Method::DELETE, &format!("/admin/wishes/{}", wish_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, &reactions_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
