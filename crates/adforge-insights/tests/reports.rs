//! Report builders against a real database, using `#[sqlx::test]`.

use adforge_core::{parse_seed, ActingRole};
use adforge_db::{list_content_pieces, seed_product, set_archived, ContentListFilter};
use adforge_insights::{insights_report, performance_report, ReportError};
use uuid::Uuid;

const SEED: &str = r#"
product:
  name: Lumen Desk Lamp
avatars:
  - key: owl
    name: Night Owl Nadia
    pain_points: ["eye strain", "poor sleep"]
  - key: parent
    name: Busy Parent Pat
    pain_points: ["no time"]
campaigns:
  - key: ig
    avatar: owl
    angle: Better sleep
    channel: instagram
    hook: Still scrolling at 2am?
    content_type: post
    category: social
  - key: mail
    avatar: parent
    angle: Save time
    channel: newsletter
    hook: Five minutes back every evening
    content_type: email
    category: email
content:
  - key: a
    campaign: ig
    type: post
    title: Piece A
    body: Why does your lamp keep you up?
    rating: 1
    engagement:
      likes: 40
  - key: b
    campaign: mail
    type: email
    title: Piece B
    body: Warm light after dark.
    rating: -1
  - key: c
    campaign: mail
    type: email
    title: Piece C
    body: Never clicked, never rated.
links:
  - slug: lumen-a
    destination_url: https://example.com/a
    content: a
    click_count: 30
  - slug: lumen-mail
    destination_url: https://example.com/mail
    campaign: mail
    click_count: 10
"#;

async fn seed(pool: &sqlx::PgPool) -> Uuid {
    let file = parse_seed(SEED).expect("valid seed");
    seed_product(pool, &file)
        .await
        .expect("seed_product failed")
        .product_id
}

#[sqlx::test(migrations = "../../migrations")]
async fn performance_report_rolls_up_clicks(pool: sqlx::PgPool) {
    let product_id = seed(&pool).await;

    let report = performance_report(&pool, product_id, ActingRole::Viewer, false)
        .await
        .expect("report");

    assert!(report.rollup.has_data);
    assert_eq!(report.rollup.total_clicks, 40);
    assert_eq!(report.rollup.avatars[0].avatar_name, "Night Owl Nadia");
    assert_eq!(report.rollup.avatars[0].normalized_score, 100);
    assert_eq!(report.rollup.avatars[1].normalized_score, 33);
    assert_eq!(
        report.rollup.avatars[0].top_channel.as_deref(),
        Some("instagram")
    );

    // piece C has no signal and is not scored
    assert_eq!(report.pieces.len(), 2);
    assert_eq!(report.pieces[0].title, "Piece A");
    assert_eq!(report.pieces[0].composite_score, 100);
}

#[sqlx::test(migrations = "../../migrations")]
async fn only_admin_may_include_archived(pool: sqlx::PgPool) {
    let product_id = seed(&pool).await;

    let err = performance_report(&pool, product_id, ActingRole::Editor, true)
        .await
        .expect_err("editors cannot see archived");
    assert!(matches!(err, ReportError::Access(_)));

    let report = performance_report(&pool, product_id, ActingRole::Admin, true)
        .await
        .expect("admin report");
    assert!(report.include_archived);
}

#[sqlx::test(migrations = "../../migrations")]
async fn archived_pieces_drop_out_of_reports(pool: sqlx::PgPool) {
    let product_id = seed(&pool).await;
    let pieces = list_content_pieces(&pool, product_id, ContentListFilter::default(), 10, None)
        .await
        .expect("list");
    let a = pieces.iter().find(|p| p.title == "Piece A").expect("a").id;
    set_archived(&pool, a, true, ActingRole::Editor)
        .await
        .expect("archive");

    let report = performance_report(&pool, product_id, ActingRole::Editor, false)
        .await
        .expect("report");
    assert_eq!(report.rollup.total_clicks, 10);
    assert!(report.pieces.iter().all(|p| p.content_piece_id != a));

    let with_archived = performance_report(&pool, product_id, ActingRole::Admin, true)
        .await
        .expect("admin report");
    assert_eq!(with_archived.rollup.total_clicks, 40);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insights_report_separates_thumbs_down(pool: sqlx::PgPool) {
    let product_id = seed(&pool).await;

    let report = insights_report(&pool, product_id, ActingRole::Viewer)
        .await
        .expect("report");
    let insights = report.insights.expect("signal present");

    assert_eq!(insights.scored_count, 2);
    assert_eq!(insights.top_performers.len(), 1);
    assert_eq!(insights.top_performers[0].title, "Piece A");
    assert_eq!(insights.thumbs_down.len(), 1);
    assert_eq!(insights.thumbs_down[0].title, "Piece B");
    assert!(insights.underperformers.is_empty());
    assert_eq!(insights.patterns.top_channels[0].value, "instagram");
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_product_is_reported(pool: sqlx::PgPool) {
    let missing = Uuid::new_v4();
    let err = insights_report(&pool, missing, ActingRole::Admin)
        .await
        .expect_err("unknown product");
    assert!(matches!(err, ReportError::ProductNotFound(id) if id == missing));
}

#[sqlx::test(migrations = "../../migrations")]
async fn product_without_signal_has_no_insights(pool: sqlx::PgPool) {
    let file = parse_seed("product:\n  name: Empty\n").expect("valid seed");
    let product_id = seed_product(&pool, &file).await.expect("seed").product_id;

    let report = insights_report(&pool, product_id, ActingRole::Editor)
        .await
        .expect("report");
    assert!(report.insights.is_none());

    let perf = performance_report(&pool, product_id, ActingRole::Editor, false)
        .await
        .expect("report");
    assert!(!perf.rollup.has_data);
    assert!(perf.pieces.is_empty());
}
