use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use shala::config::{AdminConfig, SmtpConfig};
use shala::db::Store;
use shala::services::{Mailer, auth};
use shala::web::{AppState, router};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "yoga2025";

/// In-memory store with a single pooled connection so every request sees
/// the same database.
async fn spawn_app() -> Router {
    let store = Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to create store");

    let admin = AdminConfig {
        default_username: ADMIN_USERNAME.to_string(),
        default_password: Some(ADMIN_PASSWORD.to_string()),
    };
    auth::bootstrap_admin_if_absent(&store, &admin)
        .await
        .expect("Failed to bootstrap admin");

    let mailer = Mailer::from_config(&SmtpConfig::default()).expect("Failed to create mailer");

    router(Arc::new(AppState {
        store,
        mailer: Arc::new(mailer),
    }))
}

fn basic_auth(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"))
    )
}

async fn get(app: &Router, uri: &str, auth: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(
    app: &Router,
    uri: &str,
    body: &str,
    auth: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Creates a workshop through the admin endpoint and returns nothing; the
/// app only ever serves its latest workshop.
async fn create_workshop(app: &Router, title: &str) {
    let body = format!(
        "title={}&description=Breath+and+movement&workshop_date=2025-03-15&workshop_time=18:00&location=Studio+A&max_capacity=25",
        urlencoding::encode(title),
    );
    let response = post_form(
        app,
        "/admin/create-workshop",
        &body,
        Some(&basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin"
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = spawn_app().await;

    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_home_renders_empty_state_without_workshop() {
    let app = spawn_app().await;

    let response = get(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("No upcoming workshops"));
}

#[tokio::test]
async fn test_admin_routes_require_basic_auth() {
    let app = spawn_app().await;

    let response = get(&app, "/admin", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Admin Area\"",
    );

    // Wrong password and unknown username are indistinguishable.
    let wrong_password = get(&app, "/admin", Some(&basic_auth(ADMIN_USERNAME, "nope"))).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_user = get(&app, "/admin", Some(&basic_auth("ghost", "nope"))).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let response = get(
        &app,
        "/admin",
        Some(&basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Signed in as admin"));
}

#[tokio::test]
async fn test_signup_flow_end_to_end() {
    let app = spawn_app().await;
    create_workshop(&app, "Morning Flow").await;

    let home = body_string(get(&app, "/", None).await).await;
    assert!(home.contains("Morning Flow"));
    assert!(home.contains("Saturday, March 15, 2025 at 6:00 PM"));
    assert!(home.contains("0 of 25 spots filled"));

    let response = post_form(
        &app,
        "/signup",
        "workshop_id=1&first_name=Maya&last_name=Rivera&email=maya%40example.com&phone=&country_code=%2B1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/?success=true"
    );

    let home = body_string(get(&app, "/?success=true", None).await).await;
    assert!(home.contains("Thank you for signing up"));
    assert!(home.contains("1 of 25 spots filled"));

    let dashboard = body_string(
        get(
            &app,
            "/admin",
            Some(&basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)),
        )
        .await,
    )
    .await;
    assert!(dashboard.contains("Maya"));
    assert!(dashboard.contains("maya@example.com"));
    assert!(dashboard.contains("1 signups"));
}

#[tokio::test]
async fn test_signup_stores_combined_phone() {
    let app = spawn_app().await;
    create_workshop(&app, "Evening Restore").await;

    let response = post_form(
        &app,
        "/signup",
        "workshop_id=1&first_name=Ana&last_name=Khan&email=ana%40example.com&phone=%28555%29+123-4567&country_code=%2B1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let export = get(
        &app,
        "/admin/export-csv",
        Some(&basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)),
    )
    .await;
    assert_eq!(export.status(), StatusCode::OK);

    let csv = body_string(export).await;
    assert!(csv.contains("+1 (555) 123-4567"));
}

#[tokio::test]
async fn test_signup_rejects_short_phone() {
    let app = spawn_app().await;
    create_workshop(&app, "Morning Flow").await;

    let response = post_form(
        &app,
        "/signup",
        "workshop_id=1&first_name=Maya&last_name=Rivera&email=maya%40example.com&phone=555-1234&country_code=",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("valid phone number"));

    // Nothing was stored.
    let dashboard = body_string(
        get(
            &app,
            "/admin",
            Some(&basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)),
        )
        .await,
    )
    .await;
    assert!(dashboard.contains("0 signups"));
}

#[tokio::test]
async fn test_signup_rejects_missing_fields_and_bad_email() {
    let app = spawn_app().await;
    create_workshop(&app, "Morning Flow").await;

    let missing = post_form(
        &app,
        "/signup",
        "workshop_id=1&first_name=Maya&last_name=&email=maya%40example.com",
        None,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let bad_email = post_form(
        &app,
        "/signup",
        "workshop_id=1&first_name=Maya&last_name=Rivera&email=not-an-email",
        None,
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_for_unknown_workshop_is_server_error() {
    let app = spawn_app().await;
    create_workshop(&app, "Morning Flow").await;

    let response = post_form(
        &app,
        "/signup",
        "workshop_id=999&first_name=Maya&last_name=Rivera&email=maya%40example.com",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], "Workshop not found");
}

#[tokio::test]
async fn test_create_workshop_validation() {
    let app = spawn_app().await;
    let auth_header = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);

    let missing = post_form(
        &app,
        "/admin/create-workshop",
        "title=Flow&description=&workshop_date=2025-03-15&workshop_time=18:00&location=Studio&max_capacity=10",
        Some(&auth_header),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let bad_date = post_form(
        &app,
        "/admin/create-workshop",
        "title=Flow&description=x&workshop_date=15%2F03%2F2025&workshop_time=18:00&location=Studio&max_capacity=10",
        Some(&auth_header),
    )
    .await;
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_str(&body_string(bad_date).await).unwrap();
    assert_eq!(body["error"], "Invalid date or time format");

    let zero_capacity = post_form(
        &app,
        "/admin/create-workshop",
        "title=Flow&description=x&workshop_date=2025-03-15&workshop_time=18:00&location=Studio&max_capacity=0",
        Some(&auth_header),
    )
    .await;
    assert_eq!(zero_capacity.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = spawn_app().await;
    let old_auth = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);

    let mismatch = post_form(
        &app,
        "/admin/change-password",
        "current_password=yoga2025&new_password=lotus-flower&confirm_password=other",
        Some(&old_auth),
    )
    .await;
    assert_eq!(mismatch.status(), StatusCode::SEE_OTHER);
    let location = mismatch
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.contains("password_error="));

    let wrong_current = post_form(
        &app,
        "/admin/change-password",
        "current_password=wrong&new_password=lotus-flower&confirm_password=lotus-flower",
        Some(&old_auth),
    )
    .await;
    let location = wrong_current
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.contains("password_error=Current%20password%20is%20incorrect"));

    let too_short = post_form(
        &app,
        "/admin/change-password",
        "current_password=yoga2025&new_password=om&confirm_password=om",
        Some(&old_auth),
    )
    .await;
    let location = too_short
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.contains("password_error="));

    let success = post_form(
        &app,
        "/admin/change-password",
        "current_password=yoga2025&new_password=lotus-flower&confirm_password=lotus-flower",
        Some(&old_auth),
    )
    .await;
    assert_eq!(success.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        success.headers().get(header::LOCATION).unwrap(),
        "/admin?password_changed=true"
    );

    // The old password no longer authenticates, the new one does.
    let stale = get(&app, "/admin", Some(&old_auth)).await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    let fresh = get(
        &app,
        "/admin",
        Some(&basic_auth(ADMIN_USERNAME, "lotus-flower")),
    )
    .await;
    assert_eq!(fresh.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_csv_export() {
    let app = spawn_app().await;
    let auth_header = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);

    let no_workshop = get(&app, "/admin/export-csv", Some(&auth_header)).await;
    assert_eq!(no_workshop.status(), StatusCode::NOT_FOUND);

    create_workshop(&app, "Morning Flow").await;

    for (first, last, email) in [
        ("Ana", "Khan", "ana%40example.com"),
        ("Ben", "Okafor", "ben%40example.com"),
    ] {
        let body = format!(
            "workshop_id=1&first_name={first}&last_name={last}&email={email}&phone=&country_code="
        );
        let response = post_form(&app, "/signup", &body, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let export = get(&app, "/admin/export-csv", Some(&auth_header)).await;
    assert_eq!(export.status(), StatusCode::OK);
    assert_eq!(
        export.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    let disposition = export
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=workshop-signups-"));

    let csv = body_string(export).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "First Name,Last Name,Email,Phone,Signed Up At");
    // Export order is ascending by creation, independent of the
    // newest-first dashboard ordering.
    assert!(lines[1].starts_with("Ana,Khan,ana@example.com,"));
    assert!(lines[2].starts_with("Ben,Okafor,ben@example.com,"));
}
