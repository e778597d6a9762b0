use super::*;
use adforge_core::{parse_seed, ActingRole, RejectReason};
use adforge_db::SeedSummary;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use tower::ServiceExt;

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(1_000)), 200);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn lifecycle_errors_map_to_codes() {
    let forbidden = LifecycleError::Forbidden {
        role: ActingRole::Viewer,
        action: "transition content",
    };
    let err = map_db_error("req-1".to_string(), &DbError::Lifecycle(forbidden), "content piece");
    assert_eq!(err.error.code, "forbidden");
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

    let invalid = LifecycleError::InvalidTransition {
        from: adforge_core::ContentStatus::Draft,
        to: adforge_core::ContentStatus::Posted,
        reason: RejectReason::NotAllowed,
    };
    let err = map_db_error("req-2".to_string(), &DbError::Lifecycle(invalid), "content piece");
    assert_eq!(err.error.code, "invalid_transition");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn not_found_names_the_resource() {
    let err = map_db_error("req-1".to_string(), &DbError::NotFound, "content piece");
    assert_eq!(err.error.code, "not_found");
    assert_eq!(err.error.message, "content piece not found");
}

#[test]
fn parse_id_rejects_non_uuid() {
    let err = parse_id("req-1", "not-a-uuid", "content id").unwrap_err();
    assert_eq!(err.error.code, "validation_error");
    assert!(err.error.message.contains("not-a-uuid"));
}

// -------------------------------------------------------------------------
// Route integration tests (with DB)
// -------------------------------------------------------------------------

const SEED: &str = r#"
product:
  name: Lumen Desk Lamp
avatars:
  - key: owl
    name: Night Owl Nadia
    pain_points: ["eye strain"]
campaigns:
  - key: ig
    avatar: owl
    angle: Better sleep
    channel: instagram
    hook: Still scrolling at 2am?
    content_type: post
    category: social
content:
  - key: a
    campaign: ig
    type: post
    title: Piece A
    body: Why does your lamp keep you up?
    rating: 1
  - key: b
    campaign: ig
    type: post
    title: Piece B
    body: Warm light after dark.
  - key: c
    campaign: ig
    type: post
    title: Piece C
    body: Read longer, sleep sooner.
links:
  - slug: lumen-a
    destination_url: https://example.com/a
    content: a
    click_count: 30
  - slug: lumen-b
    destination_url: https://example.com/b
    content: b
    click_count: 10
"#;

async fn seed(pool: &sqlx::PgPool) -> SeedSummary {
    let file = parse_seed(SEED).expect("valid seed");
    adforge_db::seed_product(pool, &file)
        .await
        .expect("seed_product failed")
}

async fn piece_id(pool: &sqlx::PgPool, product_id: uuid::Uuid, title: &str) -> uuid::Uuid {
    adforge_db::list_content_pieces(
        pool,
        product_id,
        adforge_db::ContentListFilter::default(),
        50,
        None,
    )
    .await
    .expect("list_content_pieces failed")
    .into_iter()
    .find(|p| p.title == title)
    .map(|p| p.id)
    .expect("piece exists")
}

fn open_app(pool: sqlx::PgPool) -> Router {
    let auth = AuthState::from_keys("", true).expect("auth");
    build_app(AppState { pool }, auth, default_rate_limit_state())
}

fn keyed_app(pool: sqlx::PgPool) -> Router {
    let auth = AuthState::from_keys("edit-key,view-key:viewer,admin-key:admin", false)
        .expect("auth");
    build_app(AppState { pool }, auth, default_rate_limit_state())
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json parse")
    };
    (status, json)
}

#[sqlx::test(migrations = "../../migrations")]
async fn content_list_pages_with_cursor(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let app = open_app(pool);
    let base = format!("/api/v1/products/{}/content", summary.product_id);

    let (status, first) = send(app.clone(), Method::GET, &format!("{base}?limit=2"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = first["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    let cursor = first["data"]["next_cursor"].as_str().expect("next cursor");

    let (status, second) = send(
        app,
        Method::GET,
        &format!("{base}?limit=2&cursor={cursor}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["items"].as_array().map(Vec::len), Some(1));
    assert!(second["data"]["next_cursor"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn content_list_rejects_unknown_status(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let (status, body) = send(
        open_app(pool),
        Method::GET,
        &format!("/api/v1/products/{}/content?status=published", summary.product_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_content_validates_and_finds(pool: sqlx::PgPool) {
    let app = open_app(pool);

    let (status, body) = send(app.clone(), Method::GET, "/api/v1/content/xyz", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let unknown = uuid::Uuid::new_v4();
    let (status, body) = send(app, Method::GET, &format!("/api/v1/content/{unknown}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "content piece not found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn transition_route_applies_and_rejects(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let id = piece_id(&pool, summary.product_id, "Piece A").await;
    let app = open_app(pool);
    let uri = format!("/api/v1/content/{id}/transition");

    let (status, body) = send(app.clone(), Method::POST, &uri, None, Some(json!({"to": "approved"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "applied");
    assert_eq!(body["data"]["kind"], "approve");
    assert_eq!(body["data"]["piece"]["status"], "approved");

    let (status, body) = send(app.clone(), Method::POST, &uri, None, Some(json!({"to": "approved"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "unchanged");
    assert!(body["data"]["kind"].is_null());

    let (status, body) = send(app, Method::POST, &uri, None, Some(json!({"to": "posted"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_transition");
}

#[sqlx::test(migrations = "../../migrations")]
async fn bearer_keys_gate_routes_by_role(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let id = piece_id(&pool, summary.product_id, "Piece B").await;
    let app = keyed_app(pool);
    let uri = format!("/api/v1/content/{id}/transition");
    let body = json!({"to": "approved"});

    let (status, json) = send(app.clone(), Method::POST, &uri, None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "unauthorized");

    let (status, json) = send(app.clone(), Method::POST, &uri, Some("view-key"), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "forbidden");

    let (status, _) = send(app.clone(), Method::GET, &format!("/api/v1/content/{id}"), Some("view-key"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(app.clone(), Method::POST, &uri, Some("edit-key"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["piece"]["status"], "approved");

    let (status, _) = send(app, Method::GET, "/api/v1/health", None, None).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn bulk_route_reports_applied_and_skipped(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let a = piece_id(&pool, summary.product_id, "Piece A").await;
    let b = piece_id(&pool, summary.product_id, "Piece B").await;
    let app = open_app(pool);

    let (status, _) = send(
        app.clone(),
        Method::POST,
        &format!("/api/v1/content/{a}/transition"),
        None,
        Some(json!({"to": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/content/bulk-transition",
        None,
        Some(json!({
            "to": "scheduled",
            "ids": [a, b],
            "scheduled_for": "2030-01-01T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["applied_count"], 1);
    assert_eq!(body["data"]["skipped_count"], 1);
    assert_eq!(body["data"]["applied"][0], a.to_string());
    assert_eq!(body["data"]["skipped"][0], b.to_string());
}

#[sqlx::test(migrations = "../../migrations")]
async fn archive_route_hides_piece_from_default_listing(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let c = piece_id(&pool, summary.product_id, "Piece C").await;
    let app = open_app(pool);

    let (status, body) = send(
        app.clone(),
        Method::PUT,
        &format!("/api/v1/content/{c}/archive"),
        None,
        Some(json!({"archived": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["archived"], true);

    let base = format!("/api/v1/products/{}/content", summary.product_id);
    let (_, active) = send(app.clone(), Method::GET, &base, None, None).await;
    assert_eq!(active["data"]["items"].as_array().map(Vec::len), Some(2));

    let (_, all) = send(app, Method::GET, &format!("{base}?include_archived=true"), None, None).await;
    assert_eq!(all["data"]["items"].as_array().map(Vec::len), Some(3));
}

#[sqlx::test(migrations = "../../migrations")]
async fn performance_route_restricts_archived_to_admin(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let app = keyed_app(pool);
    let base = format!("/api/v1/products/{}/performance", summary.product_id);

    let (status, body) = send(app.clone(), Method::GET, &base, Some("view-key"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_clicks"], 40);
    assert_eq!(body["data"]["product_name"], "Lumen Desk Lamp");

    let archived = format!("{base}?include_archived=true");
    let (status, body) = send(app.clone(), Method::GET, &archived, Some("edit-key"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");

    let (status, body) = send(app, Method::GET, &archived, Some("admin-key"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["include_archived"], true);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insights_route_returns_patterns_or_404(pool: sqlx::PgPool) {
    let summary = seed(&pool).await;
    let app = open_app(pool);

    let (status, body) = send(
        app.clone(),
        Method::GET,
        &format!("/api/v1/products/{}/insights", summary.product_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let insights = &body["data"]["insights"];
    assert_eq!(insights["scored_count"], 2);
    assert_eq!(insights["patterns"]["top_channels"][0]["value"], "instagram");
    assert!(insights["thumbs_down"].as_array().is_some_and(Vec::is_empty));

    let unknown = uuid::Uuid::new_v4();
    let (status, body) = send(
        app,
        Method::GET,
        &format!("/api/v1/products/{unknown}/insights"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}
