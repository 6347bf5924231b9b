//! Integration tests for tag suggestions.
//!
//! The heuristics run against stored submissions: content classification
//! (theme vs snippet) plus preview luminance (dark vs light). Undecodable
//! inputs drop their tag instead of failing the request.

mod common;

use std::collections::HashMap;
use std::io::Cursor;

use crate::common::{create_test_user, encoded_css, TestHarness};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use portal_core::common::{ApiError, SubmissionId};
use portal_core::domains::submissions::actions::suggest_tags;
use portal_core::domains::submissions::models::{NewSubmission, Submission, ValidatedUser};
use portal_core::domains::users::User;
use test_context::test_context;

/// Preview value with no usable image bytes; keeps the test offline.
const NO_PREVIEW: &str = "attachment://missing-preview";

async fn create_submission_with(
    ctx: &TestHarness,
    submitter: &User,
    content: &str,
    preview_image: &str,
) -> Submission {
    let mut validated_users = HashMap::new();
    validated_users.insert(submitter.id, ValidatedUser::of(submitter));

    Submission::create(
        NewSubmission {
            title: "Heuristic Probe".to_string(),
            description: "Fixture for tag heuristics".to_string(),
            source_link: "https://github.com/example/probe".to_string(),
            content: content.to_string(),
            preview_image: preview_image.to_string(),
            contributors: vec![submitter.id],
            validated_users,
            submitted_by: submitter.id,
        },
        &ctx.db_pool,
    )
    .await
    .expect("Failed to create submission")
}

fn png_data_url(r: u8, g: u8, b: u8) -> String {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([r, g, b]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&buf))
}

// =============================================================================
// Content classification
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn import_directive_suggests_theme(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_import", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_import", false)
        .await
        .expect("Failed to create submitter");
    let submission = create_submission_with(
        ctx,
        &submitter,
        &encoded_css("@import url('base.css');\n.panel { border: none; }"),
        NO_PREVIEW,
    )
    .await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should succeed");

    assert_eq!(suggestions, vec!["theme"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn long_content_suggests_theme(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_long", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_long", false)
        .await
        .expect("Failed to create submitter");
    let long_css = ".selector { margin: 0; } ".repeat(30);
    let submission =
        create_submission_with(ctx, &submitter, &encoded_css(&long_css), NO_PREVIEW).await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should succeed");

    assert_eq!(suggestions, vec!["theme"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn short_content_suggests_snippet(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_short", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_short", false)
        .await
        .expect("Failed to create submitter");
    let submission = create_submission_with(
        ctx,
        &submitter,
        &encoded_css(".chip { border-radius: 4px; }"),
        NO_PREVIEW,
    )
    .await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should succeed");

    assert_eq!(suggestions, vec!["snippet"]);
}

// =============================================================================
// Preview luminance
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn dark_preview_suggests_dark(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_dark", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_dark", false)
        .await
        .expect("Failed to create submitter");
    let submission = create_submission_with(
        ctx,
        &submitter,
        &encoded_css(".short {}"),
        &png_data_url(16, 16, 16),
    )
    .await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should succeed");

    assert_eq!(suggestions, vec!["snippet", "dark"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn light_preview_suggests_light(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_light", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_light", false)
        .await
        .expect("Failed to create submitter");
    let submission = create_submission_with(
        ctx,
        &submitter,
        &encoded_css(".short {}"),
        &png_data_url(230, 230, 230),
    )
    .await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should succeed");

    assert_eq!(suggestions, vec!["snippet", "light"]);
}

// =============================================================================
// Degradation
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn undecodable_content_degrades_to_the_image_tag(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_badcontent", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_badcontent", false)
        .await
        .expect("Failed to create submitter");
    let submission =
        create_submission_with(ctx, &submitter, "!!not-base64!!", &png_data_url(16, 16, 16)).await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should degrade, not fail");

    assert_eq!(suggestions, vec!["dark"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn broken_preview_degrades_to_the_content_tag(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_badimage", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "artist_badimage", false)
        .await
        .expect("Failed to create submitter");
    let submission = create_submission_with(
        ctx,
        &submitter,
        &encoded_css("@import 'frame.css';"),
        "data:image/png;base64,%%%%",
    )
    .await;

    let suggestions = suggest_tags(submission.id, &admin, &ctx.db_pool)
        .await
        .expect("Suggestions should degrade, not fail");

    assert_eq!(suggestions, vec!["theme"]);
}

// =============================================================================
// Guards
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn suggestions_require_admin(ctx: &TestHarness) {
    let outsider = create_test_user(&ctx.db_pool, "plain_user_tags", false)
        .await
        .expect("Failed to create user");
    let submission = create_submission_with(
        ctx,
        &outsider,
        &encoded_css(".short {}"),
        NO_PREVIEW,
    )
    .await;

    let err = suggest_tags(submission.id, &outsider, &ctx.db_pool)
        .await
        .expect_err("Non-admin suggestion request should be rejected");

    assert!(matches!(err, ApiError::AuthorizationError(_)), "got: {err}");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn suggestions_for_a_missing_submission_are_not_found(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "mod_tags_missing", true)
        .await
        .expect("Failed to create admin");

    let err = suggest_tags(SubmissionId::new(), &admin, &ctx.db_pool)
        .await
        .expect_err("Missing submission should be not found");

    assert!(matches!(err, ApiError::NotFound(_)), "got: {err}");
    assert_eq!(err.to_string(), "Submission not found");
}
