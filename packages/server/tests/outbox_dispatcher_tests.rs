//! End-to-end tests for the outbox dispatcher.
//!
//! A real dispatcher drains the queue while the test polls the recipient's
//! feed. Tests filter by notification kind so parallel tests (and their
//! announcements) cannot bleed into each other's assertions.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::common::{create_pending_submission, create_test_user, TestHarness};
use portal_core::common::UserId;
use portal_core::domains::notifications::actions::{announce, AnnounceRequest};
use portal_core::domains::notifications::{Notification, NotificationKind};
use portal_core::domains::submissions::actions::{approve_submission, ApproveRequest};
use portal_core::kernel::{
    NewOutboxEntry, OutboxDispatcher, OutboxDispatcherConfig, OutboxEntry, OutboxStatus,
};
use test_context::test_context;

fn fast_config(worker_id: &str) -> OutboxDispatcherConfig {
    OutboxDispatcherConfig {
        batch_size: 10,
        poll_interval: Duration::from_millis(50),
        worker_id: worker_id.to_string(),
    }
}

async fn wait_for_kind(
    ctx: &TestHarness,
    user_id: UserId,
    kind: NotificationKind,
    expected: usize,
) -> Vec<Notification> {
    for _ in 0..100 {
        let rows = Notification::find_recent_by_user(user_id, 50, &ctx.db_pool)
            .await
            .expect("Failed to read feed");
        let matching: Vec<Notification> = rows.into_iter().filter(|n| n.kind == kind).collect();
        if matching.len() >= expected {
            return matching;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("Timed out waiting for {expected} {kind} notification(s) for {user_id}");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn dispatcher_delivers_intents_to_the_feed(ctx: &TestHarness) {
    let target = create_test_user(&ctx.db_pool, "dispatch_target", false)
        .await
        .expect("Failed to create user");

    let mut conn = ctx
        .db_pool
        .acquire()
        .await
        .expect("Failed to acquire connection");
    OutboxEntry::enqueue(
        NewOutboxEntry::theme_approved(target.id, "Queue Probe"),
        &mut conn,
    )
    .await
    .expect("Failed to enqueue intent");
    drop(conn);

    let dispatcher =
        OutboxDispatcher::with_config(ctx.db_pool.clone(), fast_config("test-worker-deliver"));
    let shutdown = dispatcher.shutdown_handle();
    let handle = tokio::spawn(dispatcher.run());

    let feed = wait_for_kind(ctx, target.id, NotificationKind::ThemeApproved, 1).await;
    assert_eq!(
        feed[0].message,
        "Your theme \"Queue Probe\" has been approved!"
    );
    assert!(!feed[0].read);

    // Give the dispatcher a beat to close out the intent row. Filter by
    // kind: a parallel announcement test may target this user too.
    ctx.settle().await;
    let intents: Vec<OutboxEntry> = OutboxEntry::find_by_user(target.id, &ctx.db_pool)
        .await
        .expect("Failed to read outbox")
        .into_iter()
        .filter(|e| e.kind == NotificationKind::ThemeApproved)
        .collect();
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].status, OutboxStatus::Delivered);
    assert!(intents[0].delivered_at.is_some());

    shutdown.store(true, Ordering::SeqCst);
    handle
        .await
        .expect("Dispatcher task panicked")
        .expect("Dispatcher exited with an error");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_notice_travels_from_decision_to_feed(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "dispatch_mod", true)
        .await
        .expect("Failed to create admin");
    let submitter = create_test_user(&ctx.db_pool, "dispatch_artist", false)
        .await
        .expect("Failed to create submitter");
    let submission = create_pending_submission(&ctx.db_pool, &submitter, "Deep Current")
        .await
        .expect("Failed to create submission");

    let dispatcher =
        OutboxDispatcher::with_config(ctx.db_pool.clone(), fast_config("test-worker-approve"));
    let shutdown = dispatcher.shutdown_handle();
    let handle = tokio::spawn(dispatcher.run());

    approve_submission(
        submission.id,
        ApproveRequest {
            tags: vec!["dark".to_string()],
        },
        &admin,
        &ctx.db_pool,
    )
    .await
    .expect("Approval should succeed");

    let feed = wait_for_kind(ctx, submitter.id, NotificationKind::ThemeApproved, 1).await;
    assert_eq!(
        feed[0].message,
        "Your theme \"Deep Current\" has been approved!"
    );
    assert!(feed[0].reason.is_none());

    shutdown.store(true, Ordering::SeqCst);
    handle
        .await
        .expect("Dispatcher task panicked")
        .expect("Dispatcher exited with an error");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn announcement_reaches_every_feed(ctx: &TestHarness) {
    let admin = create_test_user(&ctx.db_pool, "dispatch_announcer", true)
        .await
        .expect("Failed to create admin");
    let reader_a = create_test_user(&ctx.db_pool, "dispatch_reader_a", false)
        .await
        .expect("Failed to create user");
    let reader_b = create_test_user(&ctx.db_pool, "dispatch_reader_b", false)
        .await
        .expect("Failed to create user");

    let dispatcher =
        OutboxDispatcher::with_config(ctx.db_pool.clone(), fast_config("test-worker-announce"));
    let shutdown = dispatcher.shutdown_handle();
    let handle = tokio::spawn(dispatcher.run());

    announce(
        AnnounceRequest {
            title: "New tag filters".to_string(),
            message: "The catalog now filters by dark and light.".to_string(),
        },
        &admin,
        &ctx.db_pool,
    )
    .await
    .expect("Announcement should queue");

    for user in [&admin, &reader_a, &reader_b] {
        let feed = wait_for_kind(ctx, user.id, NotificationKind::Announcement, 1).await;
        assert_eq!(feed[0].message, "New tag filters");
        assert_eq!(
            feed[0].reason.as_deref(),
            Some("The catalog now filters by dark and light.")
        );
    }

    shutdown.store(true, Ordering::SeqCst);
    handle
        .await
        .expect("Dispatcher task panicked")
        .expect("Dispatcher exited with an error");
}
